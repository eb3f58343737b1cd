//! Static knowledge base of cybersecurity and fraud topics.
//!
//! An ordered priority list of topics, each with a definition and prevention
//! controls. Lookup is a case-insensitive substring scan over the inbound
//! message; the first topic in definition order wins, so overlapping topics
//! ("fraud" vs "online fraud") resolve deterministically.
//!
//! Adding a topic is a data maintenance operation, not a runtime capability.

/// One canned topic: definition plus ordered prevention controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeEntry {
    /// Topic key, lowercase. Matched as a substring of the inbound message.
    pub topic: &'static str,
    pub definition: &'static str,
    pub controls: &'static [&'static str],
}

impl KnowledgeEntry {
    /// Renders the entry as a reply block: upper-cased topic, definition,
    /// controls as a dashed list.
    pub fn render(&self) -> String {
        format!(
            "📚 Knowledge Base Match: {}\n\nDefinition:\n{}\n\nPrevention Controls:\n- {}",
            self.topic.to_uppercase(),
            self.definition,
            self.controls.join("\n- ")
        )
    }
}

/// Topic definitions, in priority order. Earlier entries win when a message
/// matches more than one topic.
const ENTRIES: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        topic: "fraud",
        definition: "Fraud is a deliberate act of deception to obtain unfair or unlawful gain. \
            It can target individuals or organizations and include identity theft, financial scams, \
            social engineering, or online deception.",
        controls: &[
            "Enable Multi-Factor Authentication (MFA) on all sensitive accounts",
            "Educate users on common fraud tactics and social engineering",
            "Monitor financial transactions for unusual activity",
            "Verify requests for money or personal data through official channels",
            "Report suspected fraud to authorities or internal security teams",
            "Use strong, unique passwords and avoid credential reuse",
        ],
    },
    KnowledgeEntry {
        topic: "cyberbullying",
        definition: "Cyberbullying is using digital platforms to harass, threaten, or humiliate \
            someone. It can occur through social media, messaging apps, emails, or forums.",
        controls: &[
            "Educate individuals on safe online behavior and respectful communication",
            "Monitor online interactions and report abusive content",
            "Use privacy settings to restrict who can contact you",
            "Avoid responding to cyberbullying messages",
            "Document and report incidents to platform moderators or authorities",
        ],
    },
    KnowledgeEntry {
        topic: "identity theft",
        definition: "Identity theft occurs when someone uses another person's personal information, \
            such as social security number, bank account, or login credentials, to commit fraud.",
        controls: &[
            "Monitor credit reports regularly",
            "Do not share sensitive personal information online",
            "Use strong passwords and MFA",
            "Shred physical documents containing sensitive information",
            "Report stolen identities immediately to authorities",
        ],
    },
    KnowledgeEntry {
        topic: "online scams",
        definition: "Online scams are schemes that trick individuals into giving money, data, or \
            access to accounts. They often appear as fake websites, job offers, or fraudulent \
            investment opportunities.",
        controls: &[
            "Verify the legitimacy of websites and offers before engaging",
            "Be skeptical of unsolicited communications promising quick money",
            "Never share personal or financial information with unverified parties",
            "Report scam websites or communications to authorities",
            "Keep systems updated and protected with security software",
        ],
    },
    KnowledgeEntry {
        topic: "social engineering",
        definition: "Social engineering is the manipulation of people into performing actions or \
            divulging confidential information, often by exploiting trust, fear, or urgency.",
        controls: &[
            "Educate employees and users about social engineering tactics",
            "Verify the identity of individuals requesting sensitive information",
            "Implement strict policies for sharing data",
            "Encourage reporting of suspicious behavior immediately",
            "Use technical controls like MFA and access restrictions",
        ],
    },
    KnowledgeEntry {
        topic: "financial scams",
        definition: "Financial scams involve tricking individuals into transferring money or \
            revealing financial details through deceitful schemes.",
        controls: &[
            "Verify payment requests carefully",
            "Be cautious with unexpected financial solicitations",
            "Use secure and traceable payment methods",
            "Monitor bank statements for unauthorized transactions",
            "Educate users about common financial fraud tactics",
        ],
    },
    KnowledgeEntry {
        topic: "data breach",
        definition: "A data breach is unauthorized access, use, or disclosure of sensitive \
            information from an organization or individual.",
        controls: &[
            "Encrypt sensitive data at rest and in transit",
            "Limit access to sensitive information based on roles",
            "Keep systems and software updated",
            "Monitor network and system logs for unusual activity",
            "Have an incident response plan for breaches",
        ],
    },
    KnowledgeEntry {
        topic: "cyber harassment",
        definition: "Cyber harassment is repeated online behavior intended to intimidate, \
            threaten, or distress a person or group.",
        controls: &[
            "Block or restrict harassers on platforms",
            "Document all incidents for reporting purposes",
            "Report abusive content to platform moderators or authorities",
            "Educate users on recognizing and preventing harassment",
            "Encourage mental health support for victims",
        ],
    },
    KnowledgeEntry {
        topic: "online fraud",
        definition: "Online fraud refers to deceitful activity carried out through digital \
            platforms to steal money, data, or personal information.",
        controls: &[
            "Use secure websites with HTTPS for transactions",
            "Enable MFA on all online accounts",
            "Educate users about fake websites and scams",
            "Monitor accounts for unauthorized activity",
            "Report incidents promptly to authorities or platforms",
        ],
    },
];

/// Read-only view over the topic list. Loaded once, safe for unsynchronized
/// concurrent reads.
pub struct KnowledgeBase {
    entries: &'static [KnowledgeEntry],
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self { entries: ENTRIES }
    }

    /// Number of topics in the base.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates topics in priority order.
    pub fn entries(&self) -> impl Iterator<Item = &'static KnowledgeEntry> {
        self.entries.iter()
    }

    /// Returns the first topic whose key appears as a case-insensitive
    /// substring of the message, or `None`. Total over all inputs: empty and
    /// non-matching messages simply return `None`.
    ///
    /// Matching is raw substring matching, so "fraud" also matches inside
    /// "fraudulent".
    pub fn lookup(&self, message: &str) -> Option<&'static KnowledgeEntry> {
        let message_lower = message.to_lowercase();
        self.entries
            .iter()
            .find(|entry| message_lower.contains(entry.topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let kb = KnowledgeBase::new();

        let entry = kb.lookup("Tell me about IDENTITY THEFT please");
        assert_eq!(entry.map(|e| e.topic), Some("identity theft"));
    }

    #[test]
    fn test_lookup_returns_none_on_empty_input() {
        let kb = KnowledgeBase::new();

        assert!(kb.lookup("").is_none());
        assert!(kb.lookup("how do I bake bread?").is_none());
    }

    #[test]
    fn test_first_topic_wins_on_overlap() {
        let kb = KnowledgeBase::new();

        // "online fraud" contains "fraud", which is defined earlier.
        let entry = kb.lookup("what is online fraud?");
        assert_eq!(entry.map(|e| e.topic), Some("fraud"));
    }

    #[test]
    fn test_render_contains_topic_and_controls() {
        let kb = KnowledgeBase::new();

        let entry = kb.lookup("data breach basics").expect("topic should match");
        let block = entry.render();
        assert!(block.contains("DATA BREACH"));
        assert!(block.contains("Definition:"));
        assert!(block.contains("- Encrypt sensitive data at rest and in transit"));
    }
}
