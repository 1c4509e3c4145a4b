//! 1920x1080 window cleared to dark blue each frame; prints the graphics backend.

fn main() {
    psim::run_or_exit(psim::variants::clear_screen());
}
