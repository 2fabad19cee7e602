/// Frame-rate overlay and periodic status notifications to the frontend.
pub mod diagnostics;
