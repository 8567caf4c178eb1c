fn main() {
    // Host builds (tests, simulation) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
