mod cookie;
mod store;
mod types;

pub use cookie::{
    prepare_sign_in_headers, prepare_sign_out_headers, session_from_cookies, session_from_headers,
};
pub use store::SessionStore;
pub use types::{CounselorStatus, Role, Session};
