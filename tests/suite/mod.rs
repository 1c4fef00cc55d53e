mod cli;
mod determinism;
mod environment;
mod export;
mod session;
