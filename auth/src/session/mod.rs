pub mod errors;
pub mod guard;
pub mod policy;

pub use errors::PolicyError;
pub use errors::SessionError;
pub use guard::Authorization;
pub use guard::SessionGuard;
pub use policy::SessionPolicy;
