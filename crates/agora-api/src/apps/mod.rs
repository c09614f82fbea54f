pub mod plan_execute;
pub mod selector_chat;

pub use plan_execute::PlanExecuteApp;
pub use selector_chat::SelectorChatApp;
