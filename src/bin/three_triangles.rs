//! Three triangles, two programs. Escape closes the window.

fn main() {
    psim::run_or_exit(psim::variants::three_triangles());
}
