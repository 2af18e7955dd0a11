// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth on /api/*)
pub mod protected; // Journals, subsections and the assistant
pub mod public; // Service info and health
