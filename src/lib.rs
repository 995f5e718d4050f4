// testexec - run executables under test and capture what they print

pub mod executor;

pub use executor::{
    Executable, ExecutorConfig, ExecutorError, Options, Output, Profile, Result, Stream, Tee,
    parse_env_entry,
};
