use std::{env, fs, path::Path};

fn main() {
    let template_path = "templates/index.html";
    println!("cargo:rerun-if-changed={}", template_path);

    let template = fs::read_to_string(template_path).expect("templates/index.html is missing");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    let dest = Path::new(&out_dir).join("index_html.rs");

    fs::write(
        dest,
        format!("pub const INDEX_HTML: &str = {:?};\n", template),
    )
    .expect("failed to write index_html.rs");
}
