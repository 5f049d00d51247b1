//! Canned replies for turns that are not answered from the knowledge base

use crate::config::SupportConfig;

use super::category::Category;

/// Answer used when retrieval or generation fails
pub const FALLBACK_ANSWER: &str =
    "I apologize, but I'm having trouble accessing the information right now. Please try again or contact support.";

/// Escalation message for a category
pub fn message_for(category: Category, support: &SupportConfig) -> String {
    match category {
        Category::General => format!(
            "For general inquiries and support:\n\n\
             📧 Email: {email}\n\
             ⏰ Support Hours: {hours}\n\n\
             Our team will be happy to assist you with your questions!",
            email = support.email,
            hours = support.hours
        ),
        Category::Products | Category::Returns | Category::Unknown => format!(
            "I apologize, but I'm unable to assist with that specific request.\n\n\
             For personalized support, please contact our team:\n\
             📧 Email: {email}\n\
             ⏰ Support Hours: {hours}\n\n\
             Our support team will be happy to help you!",
            email = support.email,
            hours = support.hours
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_message() {
        let message = message_for(Category::General, &SupportConfig::default());
        assert_eq!(
            message,
            "For general inquiries and support:\n\n📧 Email: support@techgear.com\n⏰ Support Hours: Monday-Saturday, 9AM-6PM IST\n\nOur team will be happy to assist you with your questions!"
        );
    }

    #[test]
    fn test_unknown_message() {
        let message = message_for(Category::Unknown, &SupportConfig::default());
        assert!(message.starts_with("I apologize, but I'm unable to assist"));
        assert!(message.contains("📧 Email: support@techgear.com\n"));
        assert!(message.ends_with("Our support team will be happy to help you!"));
    }

    #[test]
    fn test_messages_use_configured_contact() {
        let support = SupportConfig {
            email: "help@example.com".to_string(),
            hours: "24/7".to_string(),
        };
        for category in Category::ALL {
            let message = message_for(category, &support);
            assert!(message.contains("help@example.com"));
            assert!(message.contains("24/7"));
        }
    }
}
