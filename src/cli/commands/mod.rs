//! One module per subcommand, each exposing `execute`.

pub mod completions;
pub mod decrypt;
pub mod encrypt;
pub mod inspect;
pub mod seal_key;
