//! File-backed stores for the bot's local state: OAuth credentials, the
//! subreddit list and the script template library.

mod credentials;
mod json_file;
mod scripts;
mod subreddits;


pub use credentials::CredentialStore;
pub use scripts::ScriptLibrary;
pub use subreddits::SubredditStore;
