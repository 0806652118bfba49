// Tailor: resume and job description match analysis
//
// This is the library root. Each module corresponds to one stage of the
// analysis: parse documents, extract skills, embed and compare, then report.

pub mod analysis;
pub mod comparison;
pub mod config;
pub mod db;
pub mod documents;
pub mod output;
pub mod similarity;
pub mod skills;
pub mod status;
pub mod text;

#[cfg(feature = "web")]
pub mod web;
