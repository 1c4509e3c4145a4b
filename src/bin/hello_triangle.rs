//! One orange triangle. Escape closes the window.

fn main() {
    psim::run_or_exit(psim::variants::hello_triangle());
}
