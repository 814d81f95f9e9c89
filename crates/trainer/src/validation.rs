//! Canned validation battery
//!
//! Three fixed queries exercised after every evaluation, one per core
//! capability.

/// One validation test case
#[derive(Debug, Clone, Copy)]
pub struct ValidationQuery {
    pub query: &'static str,
    pub expected: &'static str,
    pub category: &'static str,
    pub difficulty: &'static str,
}

pub const VALIDATION_QUERIES: [ValidationQuery; 3] = [
    ValidationQuery {
        query: "What does 'liquidated damages' mean in a contract?",
        expected: "Liquidated damages are a predetermined amount of money that parties agree will be paid if one party breaches the contract...",
        category: "clause_explanation",
        difficulty: "medium",
    },
    ValidationQuery {
        query: "Explain this clause in simple terms: 'Time is of the essence'",
        expected: "This clause means that meeting deadlines is extremely important and required...",
        category: "simplification",
        difficulty: "easy",
    },
    ValidationQuery {
        query: "What should I know about non-compete agreements?",
        expected: "Non-compete agreements prevent you from working for competitors or starting a competing business...",
        category: "qa",
        difficulty: "medium",
    },
];

/// Placeholder model output for a validation query
pub fn mock_response(query: &str) -> String {
    format!("Generated response for: {}", query)
}
