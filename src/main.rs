fn main() {
    sprig::cli::run();
}
