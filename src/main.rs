fn main() {
    hana_ha::app::cli::run();
}
