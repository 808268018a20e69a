#[test]
fn check() {
    trycmd::TestCases::new()
        .case("tests/check/*.toml")
        .env("DMAP_ALLOW_STDIN", "true")
        .default_bin_name("dmap");
}

#[test]
fn convert() {
    trycmd::TestCases::new()
        .case("tests/convert/*.toml")
        .env("DMAP_ALLOW_STDIN", "true")
        .default_bin_name("dmap");
}

#[test]
fn view() {
    trycmd::TestCases::new()
        .case("tests/view/*.toml")
        .env("DMAP_ALLOW_STDIN", "true")
        .default_bin_name("dmap");
}
