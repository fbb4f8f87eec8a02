// Library root
// -----------
// The binary (`main.rs`) wires these modules together:
// - `api`: async client for the grading backend (professor example upload
//   and homework grading).
// - `config`: environment configuration, currently the backend base URL.
// - `ui`: interactive terminal flows that call into `api`.
pub mod api;
pub mod config;
pub mod ui;
