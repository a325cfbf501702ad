//! Built-in Recontinuum site content.

use crate::knowledge::KnowledgeCategory;

/// Category tables in priority order: `(category, triggers, answer)`.
pub static CATEGORIES: &[(KnowledgeCategory, &[&str], &str)] = &[
    (
        KnowledgeCategory::Greetings,
        &[
            "hello",
            "hi",
            "hey",
            "good morning",
            "good afternoon",
            "good evening",
            "namaste",
            "greetings",
            "howdy",
        ],
        "Namaste! 🙏 I'm **Recon**, the AI assistant for Recontinuum Holding Private Limited.\n\nHow can I assist you today? I can help with information about our company, portfolio, services, or how to get in touch.",
    ),
    (
        KnowledgeCategory::About,
        &[
            "what is recontinuum",
            "about recontinuum",
            "tell me about",
            "who are you",
            "what do you do",
            "about company",
            "company",
            "recontinuum",
        ],
        "**Recontinuum Holding Private Limited** is a purpose-driven holding company focused on building disciplined, science-led, and future-ready businesses that protect and enhance human potential.\n\nIndia-based with a global outlook. Our tagline: *Limitless · Leadership · Legacy*.",
    ),
    (
        KnowledgeCategory::Founder,
        &[
            "founder",
            "rajan",
            "bhosale",
            "managing director",
            "md",
            "who started",
            "who founded",
            "who leads",
            "army",
        ],
        "**Rajan Bhosale** is the Founder & Managing Director of Recontinuum.\n\nA former Indian Army professional, Mr. Bhosale leads with military discipline, structured thinking, and unwavering commitment to excellence — building institutions designed to endure for decades.",
    ),
    (
        KnowledgeCategory::Rajmeric,
        &[
            "rajmeric",
            "lifesciences",
            "life sciences",
            "nutraceutical",
            "wellness",
            "supplement",
            "health",
            "stress",
            "cognitive",
            "adaptogen",
            "performance",
        ],
        "**Rajmeric Lifesciences** is Recontinuum's flagship portfolio company:\n\n• Stress-adaptation biology\n• Cognitive balance & clarity\n• Long-term human performance\n• Science-grounded formulations\n\nRajmeric is dedicated to protecting and elevating human potential through evidence-based wellness.",
    ),
    (
        KnowledgeCategory::Services,
        &[
            "services",
            "capabilities",
            "what services",
            "what do you offer",
            "offerings",
            "governance",
            "investment",
            "advisory",
            "compliance",
            "digital",
        ],
        "Recontinuum's core capabilities:\n\n1. 🏢 **Holding & Group Management**\n2. 🧬 **Nutraceutical & Life Sciences**\n3. 📈 **Strategic Investment**\n4. ⚙️ **Governance & Compliance**\n5. 🧩 **Business Advisory**\n6. 🌐 **Digital Infrastructure**\n\nWould you like details on any specific area?",
    ),
    (
        KnowledgeCategory::Contact,
        &[
            "contact",
            "email",
            "phone",
            "address",
            "reach",
            "location",
            "sangli",
            "maharashtra",
            "call",
            "write",
            "enquiry",
        ],
        "You can reach Recontinuum through:\n\n📧 **recontinuum.hq@gmail.com**\n📞 **+91 72497 86797**\n📍 Sangli, Maharashtra – 416416, India\n🌐 www.recontinuum.com\n\nAll enquiries are handled professionally and confidentially.",
    ),
    (
        KnowledgeCategory::Portfolio,
        &[
            "portfolio",
            "subsidiary",
            "group company",
            "enterprise",
            "businesses",
            "ventures",
            "investments",
        ],
        "Recontinuum currently has **1 active portfolio enterprise**:\n\n🌿 **Rajmeric Lifesciences** — Nutraceutical & Wellness\nFocused on stress adaptation, cognitive balance, and human performance.\n\nMore ventures are in strategic evaluation.",
    ),
    (
        KnowledgeCategory::Vision,
        &[
            "vision",
            "mission",
            "goal",
            "values",
            "integrity",
            "resilience",
            "legacy",
            "future",
            "purpose",
            "philosophy",
        ],
        "Recontinuum's four core values:\n\n◈ **Integrity** — Uncompromising ethics\n◈ **Resilience** — Strength in adversity\n◈ **Precision** — Disciplined execution\n◈ **Long-Term Responsibility** — Built for generations\n\nMission: Create enduring value for individuals, communities, and future generations.",
    ),
    (
        KnowledgeCategory::Cin,
        &[
            "cin",
            "registration",
            "registered",
            "legal",
            "incorporate",
            "company number",
        ],
        "Recontinuum Holding Private Limited is a registered company in India.\n\n📋 **CIN:** U64200MH2026PTC467028\n📍 Registered in Maharashtra, India",
    ),
    (
        KnowledgeCategory::Website,
        &["website", "domain", "url", "recontinuum.com", "online"],
        "The official website is:\n\n🌐 **www.recontinuum.com**\n\nThis is the only official digital presence of Recontinuum Holding Private Limited.",
    ),
    (
        KnowledgeCategory::Thanks,
        &[
            "thank",
            "thanks",
            "thank you",
            "great",
            "awesome",
            "helpful",
            "good",
            "excellent",
            "perfect",
            "fantastic",
            "wonderful",
        ],
        "You're most welcome! 😊 It's my pleasure to assist.\n\nIs there anything else I can help you with regarding Recontinuum or Rajmeric Lifesciences?",
    ),
    (
        KnowledgeCategory::Bye,
        &[
            "bye",
            "goodbye",
            "see you",
            "take care",
            "exit",
            "close",
            "quit",
            "ciao",
        ],
        "Thank you for your interest in Recontinuum! 🙏\n\nFeel free to return anytime. Have a wonderful day!\n\n*— Recon, AI Assistant*",
    ),
];

pub static FALLBACKS: &[&str] = &[
    "I may not have that specific detail, but our team would be happy to help!\n\n📧 **recontinuum.hq@gmail.com**\n📞 **+91 72497 86797**",
    "Great question! For detailed information please reach out to **recontinuum.hq@gmail.com** and our team will respond promptly.",
    "I don't have that specific information, but please contact us at **+91 72497 86797** and we'd love to assist!",
];

pub static QUICK_QUESTIONS: &[&str] = &[
    "What is Recontinuum?",
    "Tell me about Rajmeric",
    "Who is the founder?",
    "How can I contact you?",
];

pub static GREETING: &str = "Namaste! 🙏 I'm **Recon**, AI Assistant for Recontinuum Holding Private Limited.\n\nHow can I help you today? Ask me about our company, Rajmeric Lifesciences, our team, or how to get in touch!";
