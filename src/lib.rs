// Library root
// -----------
// The binary (`main.rs`) is a thin shell around these modules.
//
// Module responsibilities:
// - `cli`: command-line flags and environment fallbacks.
// - `request`: the validated, immutable input of one submission.
// - `api`: the hosting service's "create repository" call.
// - `archive`: unpacks the uploaded ZIP, dropping a lone wrapper folder.
// - `git`: init, commit and push through the `git` binary.
// - `publish`: runs the steps in order and reports how far it got.
// - `ui`: the interactive form and its progress/result output.
pub mod api;
pub mod archive;
pub mod cli;
pub mod git;
pub mod publish;
pub mod request;
pub mod ui;
