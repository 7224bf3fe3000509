//! FAQ catalog and search.
//!
//! The catalog is a few dozen static entries, so search is a linear
//! case-insensitive substring scan run on every query.

use serde::Serialize;

/// One question and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    /// Category id, e.g. `account`.
    pub category: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
}

/// A category shown in the FAQ navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqCategory {
    pub id: &'static str,
    pub name: &'static str,
}

/// Navigable categories in display order. Entries in other categories are
/// searchable but never grouped.
pub const CATEGORIES: &[FaqCategory] = &[
    FaqCategory { id: "general", name: "General" },
    FaqCategory { id: "account", name: "Account" },
    FaqCategory { id: "borrowing", name: "Borrowing" },
    FaqCategory { id: "technical", name: "Technical" },
    FaqCategory { id: "billing", name: "Billing" },
    FaqCategory { id: "privacy", name: "Privacy" },
];

const fn entry(category: &'static str, question: &'static str, answer: &'static str) -> FaqEntry {
    FaqEntry {
        category,
        question,
        answer,
    }
}

/// The full FAQ catalog.
pub const CATALOG: &[FaqEntry] = &[
    entry(
        "general",
        "What is LibraryMS?",
        "LibraryMS is a modern digital library that lets you browse, borrow, and read books online across genres.",
    ),
    entry(
        "general",
        "How do I get started?",
        "Just sign up, verify your email, and start exploring thousands of books instantly!",
    ),
    entry(
        "general",
        "Is LibraryMS free to use?",
        "Yes! We offer a free tier with access to thousands of books. Premium features are optional.",
    ),
    entry(
        "account",
        "How do I create an account?",
        "Click the 'Sign Up' button, enter your details, and verify your email to get started.",
    ),
    entry(
        "account",
        "I forgot my password. What now?",
        "Click 'Forgot Password' on the login page and follow the email instructions to reset it.",
    ),
    entry(
        "account",
        "How can I update my profile?",
        "Go to Account Settings and click 'Edit Profile' to change your name, email, or preferences.",
    ),
    entry(
        "borrowing",
        "How do I borrow a book?",
        "Find a book, click 'Borrow', and it will appear in your personal library for reading.",
    ),
    entry(
        "borrowing",
        "How long can I keep a book?",
        "Free users: 14 days | Premium users: 21 days. Extensions allowed if no reservations exist.",
    ),
    entry(
        "borrowing",
        "Can I return a book early?",
        "Yes! You can return any borrowed book early via your Library dashboard.",
    ),
    entry(
        "technical",
        "Which devices are supported?",
        "LibraryMS works on all modern browsers: desktop, mobile, tablets, and e-readers.",
    ),
    entry(
        "technical",
        "Can I read books offline?",
        "Yes, premium users can download books and read them without internet.",
    ),
    entry(
        "technical",
        "Are there accessibility features?",
        "Yes! LibraryMS supports text resizing, dark mode, and screen reader compatibility.",
    ),
    entry(
        "billing",
        "What are the premium prices?",
        "$9.99/month or $99/year. Includes offline reading, early releases & more.",
    ),
    entry(
        "billing",
        "Can I cancel anytime?",
        "Yes, go to Account Settings > Billing to cancel. You'll keep access until your term ends.",
    ),
    entry(
        "billing",
        "What payment methods do you accept?",
        "We accept all major credit/debit cards, PayPal, and UPI payments.",
    ),
    entry(
        "privacy",
        "Is my reading private?",
        "Absolutely. Your activity is private and never shared or sold.",
    ),
    entry(
        "privacy",
        "How is my data protected?",
        "We use end-to-end encryption and are GDPR compliant to keep your data secure.",
    ),
    entry(
        "privacy",
        "Can I delete my account and data?",
        "Yes. Visit Account Settings > Privacy to request data deletion at any time.",
    ),
    entry(
        "features",
        "Can I highlight or take notes while reading?",
        "Yes! You can highlight text and add personal notes to any book. They're saved to your account for future reference.",
    ),
    entry(
        "features",
        "Can I bookmark pages?",
        "Absolutely. Use the bookmark feature to save your spot and jump back anytime.",
    ),
    entry(
        "features",
        "Can I organize my library?",
        "Yes! You can categorize, sort, and create custom collections in your personal library.",
    ),
    entry(
        "community",
        "Is there a way to discuss books with other readers?",
        "Absolutely! Join our community forums and book clubs to share reviews, insights, and connect with fellow readers.",
    ),
    entry(
        "community",
        "Are there virtual book clubs?",
        "Yes, we host monthly virtual book clubs for members across genres and age groups.",
    ),
    entry(
        "community",
        "Can I follow other readers?",
        "Yes! You can follow users, see their public libraries, and interact with their reviews.",
    ),
    entry(
        "support",
        "How do I contact support if I have issues?",
        "Click on the 'Contact Us' section or email us at support@libraryms.com. We typically respond within 24 hours.",
    ),
    entry(
        "support",
        "Is there a user guide or help center?",
        "Yes, check out our Help Center for guides, tips, and troubleshooting steps.",
    ),
    entry(
        "support",
        "Do you offer live chat support?",
        "Yes! Live chat is available 9am to 6pm IST, Monday to Saturday.",
    ),
];

/// Entries whose question or answer contains `query`, ignoring case.
///
/// An empty query matches everything. Catalog order is preserved.
#[must_use]
pub fn filter<'a>(entries: &'a [FaqEntry], query: &str) -> Vec<&'a FaqEntry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|faq| {
            faq.question.to_lowercase().contains(&needle)
                || faq.answer.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of `entries` in category `id`.
#[must_use]
pub fn count_in_category(entries: &[&FaqEntry], id: &str) -> usize {
    entries.iter().filter(|faq| faq.category == id).count()
}

/// Group `entries` under the navigable categories, in display order.
/// Categories with no entries are left out.
#[must_use]
pub fn group_by_category<'a>(
    entries: &[&'a FaqEntry],
) -> Vec<(&'static FaqCategory, Vec<&'a FaqEntry>)> {
    CATEGORIES
        .iter()
        .filter_map(|category| {
            let matching: Vec<&FaqEntry> = entries
                .iter()
                .copied()
                .filter(|faq| faq.category == category.id)
                .collect();
            (!matching.is_empty()).then_some((category, matching))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_returns_everything() {
        assert_eq!(filter(CATALOG, "").len(), CATALOG.len());
    }

    #[test]
    fn password_query_matches_case_insensitively() {
        let hits = filter(CATALOG, "PassWord");
        let expected: Vec<&FaqEntry> = CATALOG
            .iter()
            .filter(|f| {
                f.question.to_lowercase().contains("password")
                    || f.answer.to_lowercase().contains("password")
            })
            .collect();

        assert_eq!(hits, expected);
        assert!(
            hits.iter()
                .any(|f| f.question == "I forgot my password. What now?")
        );
    }

    #[test]
    fn answer_text_is_searched() {
        let hits = filter(CATALOG, "upi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "billing");
    }

    #[test]
    fn no_match_yields_empty() {
        assert!(filter(CATALOG, "quantum chromodynamics").is_empty());
    }

    #[test]
    fn grouping_skips_empty_and_unlisted_categories() {
        let hits = filter(CATALOG, "account");
        let groups = group_by_category(&hits);

        assert!(groups.iter().all(|(_, items)| !items.is_empty()));
        assert!(groups.iter().all(|(c, _)| c.id != "features"));

        let ids: Vec<&str> = groups.iter().map(|(c, _)| c.id).collect();
        let mut ordered = ids.clone();
        ordered.sort_by_key(|id| CATEGORIES.iter().position(|c| c.id == *id));
        assert_eq!(ids, ordered);
    }

    #[test]
    fn counts_follow_the_filter() {
        let all = filter(CATALOG, "");
        assert_eq!(count_in_category(&all, "billing"), 3);

        let hits = filter(CATALOG, "premium");
        assert_eq!(count_in_category(&hits, "billing"), 1);
        assert_eq!(count_in_category(&hits, "privacy"), 0);
    }
}
