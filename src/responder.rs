//! Canned replies for the chat widget.
//!
//! Replies are picked by keyword rules evaluated in table order. The first rule
//! with any matching keyword wins; when nothing matches the fallback reply is
//! used, which always carries the owner's email address.

use crate::content::Profile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyCategory {
    Greeting,
    Farewell,
    Thanks,
    SmallTalk,
    Identity,
    Ecommerce,
    MobileApp,
    WebApp,
    Redesign,
    Website,
    Seo,
    Api,
    Maintenance,
    Pricing,
    Timeline,
    Availability,
    Hiring,
    Freelance,
    Collaboration,
    Skills,
    Experience,
    Projects,
    Education,
    Resume,
    Location,
    Contact,
    Compliment,
    Joke,
    Help,
    Question,
    Fallback,
}

/// A lowercase needle tested against the lowercased message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    /// Matches anywhere, including inside longer words.
    Substring(String),
    /// Matches a whole word only, so `hi` does not fire on `this`.
    Word(String),
}

impl Keyword {
    pub fn substring(needle: &str) -> Self {
        Keyword::Substring(needle.to_lowercase())
    }

    pub fn word(needle: &str) -> Self {
        Keyword::Word(needle.to_lowercase())
    }

    fn matches(&self, lowered: &str) -> bool {
        match self {
            Keyword::Substring(needle) => lowered.contains(needle.as_str()),
            Keyword::Word(needle) => words(lowered).any(|word| word == needle),
        }
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|word| !word.is_empty())
}

/// Reply text with `{name}`, `{first_name}`, `{email}`, `{title}` and `{location}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn render(&self, profile: &Profile) -> String {
        self.0
            .replace("{name}", &profile.name)
            .replace("{first_name}", profile.first_name())
            .replace("{email}", &profile.email)
            .replace("{title}", &profile.title)
            .replace("{location}", &profile.location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRule {
    pub category: ReplyCategory,
    pub keywords: Vec<Keyword>,
    pub reply: Template,
}

impl ReplyRule {
    pub fn new(category: ReplyCategory, keywords: Vec<Keyword>, reply: &str) -> Self {
        Self {
            category,
            keywords,
            reply: Template::new(reply),
        }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| keyword.matches(lowered))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub category: ReplyCategory,
    pub text: String,
}

const FALLBACK: &str = "Thanks for reaching out! I'm not sure I followed that one, but I'd love to \
help. The quickest way to get a detailed answer is to email me at {email}.";

pub struct Responder {
    profile: Arc<Profile>,
    rules: Vec<ReplyRule>,
    fallback: Template,
}

impl Responder {
    pub fn new(profile: Arc<Profile>) -> Self {
        Self::with_rules(profile, default_rules())
    }

    pub fn with_rules(profile: Arc<Profile>, rules: Vec<ReplyRule>) -> Self {
        Self {
            profile,
            rules,
            fallback: Template::new(FALLBACK),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }

    pub fn reply(&self, message: &str) -> Reply {
        let lowered = message.to_lowercase();

        let matched = self
            .rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| (rule.category, rule.reply.render(&self.profile)))
            .filter(|(_, text)| !text.trim().is_empty());

        let (category, text) = matched.unwrap_or_else(|| {
            (ReplyCategory::Fallback, self.fallback.render(&self.profile))
        });
        debug!("Matched reply category {:?}", category);

        Reply { category, text }
    }

    pub fn reply_text(&self, message: &str) -> String {
        self.reply(message).text
    }
}

fn sub(needles: &'static [&'static str]) -> impl Iterator<Item = Keyword> {
    needles.iter().map(|n| Keyword::substring(n))
}

fn word(needles: &'static [&'static str]) -> impl Iterator<Item = Keyword> {
    needles.iter().map(|n| Keyword::word(n))
}

fn rule(
    category: ReplyCategory,
    keywords: impl IntoIterator<Item = Keyword>,
    reply: &str,
) -> ReplyRule {
    ReplyRule::new(category, keywords.into_iter().collect(), reply)
}

/// The stock rule table, most specific intents ahead of broad ones.
pub fn default_rules() -> Vec<ReplyRule> {
    use ReplyCategory::*;

    vec![
        rule(
            Greeting,
            sub(&["hello", "good morning", "good afternoon", "good evening", "greetings", "howdy"])
                .chain(word(&["hi", "hey", "hiya", "yo", "hola"])),
            "Hi there! 👋 I'm {first_name}, a {title}. How can I help you today?",
        ),
        rule(
            Farewell,
            sub(&["goodbye", "see you", "take care", "good night", "talk later"])
                .chain(word(&["bye", "cya"])),
            "Thanks for stopping by! Feel free to come back any time, or drop me a line at {email}.",
        ),
        rule(
            Thanks,
            sub(&["thank", "appreciate", "grateful"]).chain(word(&["thx", "ty"])),
            "You're very welcome! Let me know if there's anything else I can help with.",
        ),
        rule(
            SmallTalk,
            sub(&["how are you", "how's it going", "how is it going", "what's up", "whats up"]),
            "I'm doing great, thanks for asking! Always happy to chat about new projects. What brings you here?",
        ),
        rule(
            Identity,
            sub(&["who are you", "your name", "about yourself", "about you", "introduce"]),
            "I'm {name}, a {title} based in {location}. Have a look around the page for my work and background!",
        ),
        rule(
            Ecommerce,
            sub(&["e-commerce", "ecommerce", "online store", "online shop", "shopify", "sell online"]),
            "I'd love to help you sell online! I build storefronts with secure checkout, inventory \
             management and payment integration. Tell me a bit about your products, or email {email}.",
        ),
        rule(
            MobileApp,
            sub(&["mobile app", "android", "iphone", "react native", "flutter"])
                .chain(word(&["ios", "app"])),
            "Mobile apps are a great fit. I can build cross-platform apps that feel native on both \
             iOS and Android. What would your app need to do?",
        ),
        rule(
            WebApp,
            sub(&["web app", "webapp", "web application", "dashboard", "saas", "platform"]),
            "Sounds like a web application! I build fast, maintainable apps from the database up to \
             the interface. Share some details and I'll suggest an approach.",
        ),
        rule(
            Redesign,
            sub(&["redesign", "revamp", "refresh", "modernize", "modernise", "makeover"]),
            "A redesign can make a big difference. I can modernise the look, speed up the site and \
             improve mobile support. Do you have a link to the current site?",
        ),
        rule(
            Website,
            sub(&["website", "web site", "landing page", "web page", "webpage", "homepage"]),
            "I'd be happy to build your website! I create responsive, fast sites tailored to your \
             goals. What kind of site do you have in mind?",
        ),
        rule(
            Seo,
            sub(&["search engine", "google ranking", "ranking"]).chain(word(&["seo"])),
            "Good SEO starts with a fast, well-structured site. I build with semantic markup, \
             performance and metadata in mind so search engines can find you.",
        ),
        rule(
            Api,
            sub(&["backend", "back-end", "integration", "database", "server"])
                .chain(word(&["api", "apis"])),
            "I do plenty of backend work: APIs, integrations and databases. What systems do you \
             need connected?",
        ),
        rule(
            Maintenance,
            sub(&["maintenance", "maintain", "fix", "broken", "bug", "support"]),
            "I offer ongoing maintenance and support, from bug fixes to updates and monitoring. \
             Tell me what's going on and I'll take a look.",
        ),
        rule(
            Pricing,
            sub(&["price", "pricing", "cost", "how much", "budget", "quote", "estimate", "charge"])
                .chain(word(&["rate", "rates", "fee", "fees"])),
            "Every project is different, so pricing depends on scope and timeline. Send the details \
             to {email} and I'll get back to you with a tailored quote.",
        ),
        rule(
            Timeline,
            sub(&["how long", "timeline", "deadline", "turnaround", "how soon", "how quickly"]),
            "Timelines depend on scope: a simple site usually takes a couple of weeks, larger apps a \
             few months. I'm happy to work out a schedule that suits you.",
        ),
        rule(
            Availability,
            sub(&["available", "availability", "free to", "capacity", "start date", "when can you"]),
            "I'm currently taking on new work! Email {email} with your timeline and I'll confirm \
             when I can start.",
        ),
        rule(
            Hiring,
            sub(&["hire", "hiring", "full-time", "full time", "position", "opening", "recruit"])
                .chain(word(&["job", "role"])),
            "Thanks for thinking of me! I'm open to hearing about the right opportunity. Please send \
             the details to {email}.",
        ),
        rule(
            Freelance,
            sub(&["freelance", "contract", "part-time", "part time", "consult"]),
            "Yes, I take on freelance and contract work. Tell me about the project and I'll let you \
             know how I can help.",
        ),
        rule(
            Collaboration,
            sub(&["work together", "working together", "collaborat", "partner", "team up", "work with you"]),
            "I'd love to work together! Tell me a little about your idea, or email {email} and we \
             can set up a call.",
        ),
        rule(
            Skills,
            sub(&["skill", "tech stack", "technolog", "language", "framework", "tools", "rust", "react"]),
            "I work across the stack: modern frontend frameworks, backend services and cloud \
             deployment. The Skills card on this page has the full list!",
        ),
        rule(
            Experience,
            sub(&["experience", "background", "career", "worked", "years"]),
            "I've been working as a {title} for several years across startups and established \
             teams. The Experience section walks through my roles.",
        ),
        rule(
            Projects,
            sub(&["project", "portfolio", "your work", "examples", "case stud", "built"]),
            "Take a look at the Projects card for some recent work. Happy to walk you through any \
             of them in more detail!",
        ),
        rule(
            Education,
            sub(&["education", "degree", "university", "college", "certif", "studied", "school"]),
            "You'll find my certifications and training on this page. I'm always learning \
             something new!",
        ),
        rule(
            Resume,
            sub(&["resume", "résumé", "curriculum"]).chain(word(&["cv"])),
            "I'm happy to share my resume. Just email {email} and I'll send over the latest \
             version.",
        ),
        rule(
            Location,
            sub(&["where are you", "located", "location", "based", "timezone", "time zone", "remote"]),
            "I'm based in {location} and work with clients remotely all over the world.",
        ),
        rule(
            Contact,
            sub(&["contact", "email", "reach you", "get in touch", "phone", "call you"]),
            "The best way to reach me is by email at {email}. You can also use the contact form on \
             this page!",
        ),
        rule(
            Compliment,
            sub(&["awesome", "amazing", "great work", "impressive", "love your", "beautiful", "cool site", "nice"]),
            "Thank you so much, that means a lot! 😊 Let me know if you'd like to build something \
             together.",
        ),
        rule(
            Joke,
            sub(&["joke", "funny", "make me laugh"]),
            "Why do programmers prefer dark mode? Because light attracts bugs! 🐛",
        ),
        rule(
            Help,
            sub(&["help", "assist", "not sure", "confused"]),
            "Of course! You can ask me about my services, skills, experience or availability, or \
             email {email} directly.",
        ),
        rule(
            Question,
            sub(&["?"]),
            "Great question! I'd like to give you a proper answer, so please send it over to \
             {email} and I'll reply personally.",
        ),
    ]
}
