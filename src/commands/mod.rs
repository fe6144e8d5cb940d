pub mod userinfo;

pub use userinfo::getuserinfo;
