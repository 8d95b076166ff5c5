mod commit;
mod diff;
mod errors;
mod hook;
mod log;
mod plumbing;
mod reset;
mod stash;
mod status;
mod submodule;
mod tag;
