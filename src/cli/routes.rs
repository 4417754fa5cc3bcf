//! Routing table CLI command handler

use crate::routes::{self, Route};

/// Print every known page with its path and whether it is served
pub fn handle_routes() {
    println!("{:<22} {:<20} {:<8} TABS", "PAGE", "PATH", "MOUNTED");
    println!("{}", "─".repeat(58));
    println!("{:<22} {:<20} {:<8} -", "(root)", routes::ROOT, "→ /home");

    for route in Route::all() {
        println!(
            "{:<22} {:<20} {:<8} {}",
            route.title(),
            route.path(),
            if route.is_mounted() { "yes" } else { "no" },
            if routes::has_header_tabs(route.tab()) {
                "yes"
            } else {
                "-"
            }
        );
    }
}
