//! Captures git/build metadata (commit, branch, build time, rustc version)
//! into a generated `shadow.rs` that [`crate`] includes via
//! `shadow_rs::shadow!`.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
