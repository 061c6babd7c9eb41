//! Prompt assembly for the content generator.
//!
//! The prompt spells out the user's profile, hard exclusions from the
//! seen-card log, today's rotation theme, and an exact JSON example of the
//! expected output shape.

use crate::types::{Category, UserProfile};

/// System prompt establishing the generator's role.
pub const SYSTEM_PROMPT: &str = "You are a financial education assistant that generates \
personalized, beginner-friendly investment recommendations in JSON format.";

/// Interest-specific guidance, keyed on the lowercased interest label.
fn interest_guidance(interest: &str, category: Category) -> Option<&'static str> {
    let (stocks, ideas) = match interest {
        "technology" => (
            "Recommend tech stocks: semiconductors (NVDA, AMD), cloud (MSFT, AMZN), AI/ML companies, cybersecurity (CRWD, PANW), software (CRM, ADBE)",
            "Tech business ideas: SaaS tools, mobile apps, automation services, AI-powered solutions, dev tools",
        ),
        "healthcare" => (
            "Healthcare stocks: biotech (MRNA, REGN), medical devices (ABT, MDT), pharma (PFE, JNJ), health tech (TDOC, VEEV)",
            "Healthcare ideas: telemedicine platforms, medical billing software, health apps, elder care services, wellness products",
        ),
        "finance" => (
            "Finance stocks: fintech (SQ, PYPL), traditional banks (JPM, BAC), asset managers (BLK, SCHW), insurance (PGR, TRV)",
            "Finance ideas: personal finance apps, investment tools, accounting software, payment processing, financial education",
        ),
        "ecommerce" => (
            "E-commerce stocks: marketplaces (AMZN, ETSY), payment (SHOP, PYPL), logistics (UPS, FDX), retail (WMT, TGT)",
            "E-commerce ideas: niche online stores, subscription boxes, dropshipping, marketplace platforms, DTC brands",
        ),
        "creative" => (
            "Creative/Media stocks: streaming (NFLX, DIS), gaming (RBLX, EA), design tools (ADBE), social media (META)",
            "Creative ideas: content creation tools, design services, online courses, creator platforms, digital products",
        ),
        _ => return None,
    };
    Some(match category {
        Category::Stock => stocks,
        Category::Idea => ideas,
    })
}

fn relevance_strategy(interests: &[String], category: Category) -> String {
    let guidance: Vec<&str> = interests
        .iter()
        .filter_map(|interest| interest_guidance(&interest.to_lowercase(), category))
        .collect();

    if guidance.is_empty() {
        "Generate diverse recommendations that could appeal to a beginner investor".to_string()
    } else {
        guidance.join("\n")
    }
}

const STOCK_EXAMPLE: &str = r#"[
  {
    "type": "stock",
    "title": "NVIDIA",
    "ticker": "NVDA",
    "price": "$875.32",
    "changePercent": "+2.4%",
    "tagline": "Chips fueling AI innovation",
    "simpleExplainer": "NVIDIA powers AI technology used in self-driving cars and more.",
    "whatToExpect": "Stock can be volatile due to AI developments.",
    "goodReasons": [
      "Leading AI chip manufacturer",
      "Strong demand from tech companies"
    ],
    "concerns": [
      "Market dependency on AI trends",
      "High competition risk"
    ],
    "timeline": "3-5 years",
    "riskLevel": "Medium-High",
    "beginnerTip": "Invest in NVIDIA for potential growth in the AI industry.",
    "sources": [
      {"name": "Yahoo Finance", "url": "https://finance.yahoo.com/quote/NVDA"},
      {"name": "Seeking Alpha", "url": "https://seekingalpha.com/symbol/NVDA"}
    ],
    "getStarted": [
      {"name": "Robinhood", "description": "Easy app to buy stocks", "url": "https://robinhood.com"},
      {"name": "Fidelity", "description": "Full-service broker", "url": "https://fidelity.com"}
    ]
  }
]"#;

const IDEA_EXAMPLE: &str = r#"[
  {
    "type": "idea",
    "title": "Telemedicine Platform for Seniors",
    "category": "Healthcare Technology",
    "investmentRange": "$20K - $50K",
    "tagline": "Connect seniors with doctors online for convenient care",
    "simpleExplainer": "Seniors struggle to visit doctors. You could create an app for virtual consultations.",
    "whatToExpect": "It may take 6-12 months to gain user trust and traction.",
    "goodReasons": [
      "Growing telemedicine market",
      "Seniors value convenience and safety"
    ],
    "concerns": [
      "Ensuring user-friendly interface for seniors",
      "Compliance with telemedicine regulations"
    ],
    "timeline": "12-18 months to break even",
    "riskLevel": "Medium",
    "beginnerTip": "Research user needs thoroughly before building the platform.",
    "sources": [
      {"name": "American Telemedicine Association", "url": "https://www.americantelemed.org"},
      {"name": "Forbes", "url": "https://www.forbes.com/telemedicine"}
    ],
    "getStarted": [
      {"name": "Doxy.me", "description": "Free telemedicine platform", "url": "https://doxy.me"},
      {"name": "Canva", "description": "Create marketing materials", "url": "https://canva.com"}
    ]
  }
]"#;

/// Assemble the full generation prompt.
pub fn build_prompt(
    profile: &UserProfile,
    category: Category,
    count: u32,
    exclude: &[String],
    rotation_theme: &str,
) -> String {
    let type_string = match category {
        Category::Stock => "stocks",
        Category::Idea => "business ideas",
    };
    let interests_list = profile.interests.join(", ");
    let guidance = relevance_strategy(&profile.interests, category);

    let exclude_instruction = if exclude.is_empty() {
        String::new()
    } else {
        match category {
            Category::Stock => format!(
                "\n\nDO NOT RECOMMEND THESE STOCKS (user has seen them): {}",
                exclude.join(", ")
            ),
            Category::Idea => format!(
                "\n\nDO NOT RECOMMEND IDEAS WITH THESE TITLES: {}",
                exclude.join(", ")
            ),
        }
    };

    let rotation_instruction = if rotation_theme.is_empty() {
        String::new()
    } else {
        format!("\n\nTODAY'S FOCUS: {rotation_theme}")
    };

    let diversity = match category {
        Category::Stock => format!(
            "\n- Include a MIX of company sizes: 2-3 large cap, 2-3 mid cap, 2-3 small cap\n\
             - Include DIFFERENT sectors: tech, healthcare, finance, consumer, energy, etc.\n\
             - Include DIFFERENT investment themes: growth, value, dividend, innovation\n\
             - DO NOT just recommend the most popular tech stocks (NVDA, AAPL, MSFT, GOOGL, META)\n\
             - Include some lesser-known but solid companies\n\
             - Match recommendations to user's specific interests: {interests_list}\n"
        ),
        Category::Idea => "\n- Include a MIX of business types: SaaS, e-commerce, services, products, marketplaces\n\
             - Include DIFFERENT industries related to user interests\n\
             - Include DIFFERENT investment levels across the range\n\
             - DO NOT just recommend \"AI startup\" or \"app idea\" - be SPECIFIC\n\
             - Each idea should be DISTINCTLY different from others\n"
            .to_string(),
    };

    let accuracy = match category {
        Category::Stock => "\n- Use REAL ticker symbols that are currently traded on NYSE/NASDAQ\n\
             - Verify companies are active and publicly traded\n\
             - Price estimates should be realistic based on current market\n\
             - If you're unsure about a stock, choose a different one\n",
        Category::Idea => "\n- Investment ranges must be realistic for the business type\n\
             - Timeline must be achievable (12-24 months typical)\n\
             - Consider actual market demand and competition\n",
    };

    let example = match category {
        Category::Stock => STOCK_EXAMPLE,
        Category::Idea => IDEA_EXAMPLE,
    };

    format!(
        "Generate {count} DIVERSE and UNIQUE personalized {type_string} recommendations for a beginner investor.\n\
         \n\
         USER PROFILE:\n\
         - Investment budget: {budget}\n\
         - Risk tolerance: {risk}\n\
         - Interests: {interests_list}{exclude_instruction}{rotation_instruction}\n\
         \n\
         RELEVANCE STRATEGY:\n\
         {guidance}\n\
         \n\
         DIVERSITY REQUIREMENTS:\n\
         {diversity}\n\
         ACCURACY REQUIREMENTS:\n\
         {accuracy}\n\
         STRICT REQUIREMENTS:\n\
         1. Every recommendation MUST clearly relate to user's interests\n\
         2. Explain the connection to their interests in the tagline or explainer\n\
         3. Be SPECIFIC - avoid generic recommendations\n\
         4. Ensure DIVERSITY - different sectors, sizes, and themes\n\
         5. Use REAL data - valid tickers, realistic prices, working URLs\n\
         \n\
         Content quality:\n\
         - Taglines: Under 10 words, compelling but not hype\n\
         - Plain English: Truly simple, no jargon\n\
         - What to Expect: Honest and realistic\n\
         - Good Reasons: Specific (not generic like \"growing market\")\n\
         - Concerns: Legitimate risks (not just \"it might fail\")\n\
         - Beginner Tips: Actually explain investing concepts\n\
         \n\
         URLs MUST BE REAL:\n\
         - Sources: Use real financial news sites (Yahoo Finance, Seeking Alpha, MarketWatch, Motley Fool)\n\
         - Get Started: Use real platforms (Robinhood, Fidelity, E*TRADE, Shopify, Stripe, Canva, Bubble.io)\n\
         - Format: https://full-url.com (NO # placeholders, NO fake URLs)\n\
         \n\
         Return ONLY a valid JSON array. Each item must follow this exact structure:\n\
         \n\
         {example}\n\
         \n\
         Return ONLY the JSON array with NO markdown formatting.",
        budget = profile.investment_amount,
        risk = profile.risk_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            investment_amount: "$1K - $5K".to_string(),
            risk_level: "moderate".to_string(),
            interests: vec!["Technology".to_string(), "gardening".to_string()],
        }
    }

    #[test]
    fn prompt_carries_profile_and_count() {
        let prompt = build_prompt(&profile(), Category::Stock, 8, &[], "");
        assert!(prompt.starts_with("Generate 8 DIVERSE"));
        assert!(prompt.contains("$1K - $5K"));
        assert!(prompt.contains("moderate"));
    }

    #[test]
    fn exclusions_are_spelled_out() {
        let exclude = vec!["NVDA".to_string(), "AAPL".to_string()];
        let prompt = build_prompt(&profile(), Category::Stock, 5, &exclude, "");
        assert!(prompt.contains("DO NOT RECOMMEND THESE STOCKS (user has seen them): NVDA, AAPL"));

        let no_exclusions = build_prompt(&profile(), Category::Stock, 5, &[], "");
        assert!(!no_exclusions.contains("DO NOT RECOMMEND THESE STOCKS"));
    }

    #[test]
    fn rotation_theme_is_appended_when_present() {
        let prompt = build_prompt(&profile(), Category::Idea, 5, &[], "Focus on: fintech");
        assert!(prompt.contains("TODAY'S FOCUS: Focus on: fintech"));
    }

    #[test]
    fn known_interests_map_to_guidance_and_unknown_ones_are_skipped() {
        let prompt = build_prompt(&profile(), Category::Stock, 5, &[], "");
        assert!(prompt.contains("semiconductors (NVDA, AMD)"));
        assert!(!prompt.contains("gardening stocks"));

        let none = UserProfile {
            interests: vec!["gardening".to_string()],
            ..profile()
        };
        let fallback = build_prompt(&none, Category::Stock, 5, &[], "");
        assert!(fallback.contains("Generate diverse recommendations"));
    }

    #[test]
    fn example_matches_requested_category() {
        let stock = build_prompt(&profile(), Category::Stock, 5, &[], "");
        assert!(stock.contains("\"ticker\": \"NVDA\""));
        let idea = build_prompt(&profile(), Category::Idea, 5, &[], "");
        assert!(idea.contains("\"investmentRange\": \"$20K - $50K\""));
    }
}
