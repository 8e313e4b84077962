use serde::{Deserialize, Serialize};

// Service tiers offered on the landing page
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Starter,
    Advanced,
    Advanced2,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Starter => "starter",
            Plan::Advanced => "advanced",
            Plan::Advanced2 => "advanced2",
        }
    }

    pub fn parse(value: &str) -> Option<Plan> {
        match value {
            "starter" => Some(Plan::Starter),
            "advanced" => Some(Plan::Advanced),
            "advanced2" => Some(Plan::Advanced2),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Starter => "Starter",
            Plan::Advanced => "Advanced",
            Plan::Advanced2 => "Advanced 2",
        }
    }

    /// Price in EUR per project.
    pub fn price(&self) -> u32 {
        match self {
            Plan::Starter => 9,
            Plan::Advanced => 19,
            Plan::Advanced2 => 29,
        }
    }
}

/// Static catalog entry rendered as a pricing card. Never persisted.
pub struct PlanInfo {
    pub plan: Plan,
    pub features: &'static [&'static str],
    pub popular: bool,
    pub gradient: &'static str,
}

pub static CATALOG: [PlanInfo; 3] = [
    PlanInfo {
        plan: Plan::Starter,
        features: &[
            "Responsive Design",
            "Basic SEO Setup",
            "Contact Form",
            "3 Pages",
            "Mobile Optimized",
            "1 Month Support",
        ],
        popular: false,
        gradient: "gradient-blue-purple",
    },
    PlanInfo {
        plan: Plan::Advanced,
        features: &[
            "Everything in Starter",
            "Custom Animations",
            "Advanced SEO",
            "Up to 7 Pages",
            "E-commerce Ready",
            "3 Months Support",
            "Analytics Setup",
        ],
        popular: true,
        gradient: "gradient-purple-pink",
    },
    PlanInfo {
        plan: Plan::Advanced2,
        features: &[
            "Everything in Advanced",
            "Custom Functionality",
            "API Integrations",
            "Unlimited Pages",
            "Performance Optimization",
            "6 Months Support",
            "Priority Updates",
            "Consultation Calls",
        ],
        popular: false,
        gradient: "gradient-pink-red",
    },
];

pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub static FAQS: [Faq; 4] = [
    Faq {
        question: "What is included in the website development?",
        answer: "All our packages include responsive design, SEO optimization, mobile \
                 compatibility, and ongoing support based on your selected plan.",
    },
    Faq {
        question: "How long does it take to build a website?",
        answer: "Typically 1-2 weeks for Starter, 2-3 weeks for Advanced, and 3-4 weeks for \
                 Advanced 2, depending on complexity and requirements.",
    },
    Faq {
        question: "Do you provide ongoing support?",
        answer: "Yes! Each plan includes different levels of support ranging from 1 month to 6 \
                 months, with priority support for higher-tier plans.",
    },
    Faq {
        question: "Can I upgrade my plan later?",
        answer: "Absolutely! You can upgrade your plan at any time, and we'll apply the \
                 difference in cost to add more features to your website.",
    },
];
