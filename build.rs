use std::path::PathBuf;

// `include_dir!` does not register its inputs on stable, so rebuild whenever
// an embedded template changes.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let mut pending = vec![PathBuf::from("templates")];
    while let Some(dir) = pending.pop() {
        println!("cargo:rerun-if-changed={}", dir.display());
        let Ok(rd) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in rd.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}
