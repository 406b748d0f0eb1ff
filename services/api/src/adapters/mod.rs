pub mod db;
pub mod memory;
pub mod suggestions_llm;
pub mod suggestions_rules;

pub use db::DbAdapter;
pub use memory::InMemoryStore;
pub use suggestions_llm::OpenAiSuggestionAdapter;
pub use suggestions_rules::RuleBasedSuggestionAdapter;
