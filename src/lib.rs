//! Chess engine: bitboard board representation and move generation,
//! reversible make/unmake, perft, and an iterative-deepening alpha-beta
//! search, wrapped in a small UCI-compatible text interface.
//!
//! - [`chess`] is the core: squares/bitboards/attacks/[`chess::position::Position`].
//! - [`search`] drives the core with negamax and alpha-beta pruning.
//! - [`evaluation`] scores a position (material only).
//! - [`engine`] is the UCI adapter built on top of the core.

// TODO: Gradually move most of warnings to deny.
#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_doc_code_examples,
    rustdoc::private_doc_tests,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Performance is extremely important.
#![deny(clippy::perf)]

pub mod chess;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod search;
pub mod util;

pub use engine::Engine;

shadow_rs::shadow!(build);

/// Engine identity string reported to `uci`'s `id name` line and `--help`:
/// package name, semver version, and the short git commit `shadow-rs`
/// captured at build time.
#[must_use]
pub fn engine_version() -> String {
    format!("{} {}", env!("CARGO_PKG_VERSION"), build::SHORT_COMMIT)
}
