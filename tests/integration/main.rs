// Integration test suite for chatcheck
//
// Organized into focused modules:
//   mock_api      — wire-level behavior of the in-memory mock service
//   client        — HttpChatClient against a live mock instance
//   pagination    — page tokens and total-count reporting
//   chat_scenario — the account-chat scenario: properties and end-to-end run

mod common;

mod pagination;
