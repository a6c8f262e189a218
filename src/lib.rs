// Library root
// -----------
// This crate exposes a small library surface for the `unload-directory`
// binary. `main.rs` wires configuration and logging, then hands an
// `ApiClient` to the flow in `ui`.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the image server (liveness,
//   status, unload) and the payload types it returns.
// - `config`: Command line arguments, `.env` loading and logger setup.
// - `ui`: The operator-facing unload flow. Sequences the `api` calls and
//   prints human-readable results.
pub mod api;
pub mod config;
pub mod ui;
