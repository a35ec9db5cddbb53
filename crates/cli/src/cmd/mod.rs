mod clear;
mod destroy;
mod get;
mod info;
mod lock;
mod options;
mod set;

pub use clear::cmd_clear;
pub use destroy::cmd_destroy;
pub use get::cmd_get;
pub use info::cmd_info;
pub use lock::cmd_lock;
pub use options::cmd_options;
pub use set::cmd_set;
