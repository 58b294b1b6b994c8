use crate::{config::AppConfig, state::AppState};

/// Common test setup function that can be used across all test files.
/// The returned state is backed by the in-memory store, so tests never
/// touch the network.
pub fn setup_test_state() -> AppState {
    AppState::new(AppConfig::new_test_config()).expect("Failed to build test app state")
}
