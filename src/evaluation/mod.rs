//! Static position evaluation, i.e. predicting the relative value/score of
//! a given position without [`crate::search`].
//!
//! The score is returned in centipawn units, signed so a positive value
//! favours White.

pub(crate) mod material;
