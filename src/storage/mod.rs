pub mod state_file;

pub use state_file::{ChannelRecord, PersistedState, StateFileError, load_state, save_state};
