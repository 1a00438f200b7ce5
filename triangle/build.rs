// build.rs
// Compiles shaders/*.vert and shaders/*.frag to OpenGL SPIR-V next to the sources

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// glslc from the Vulkan SDK if VULKAN_SDK is set, otherwise from PATH
fn find_glslc() -> Option<PathBuf> {
    if let Ok(sdk) = env::var("VULKAN_SDK") {
        let glslc = if cfg!(target_os = "windows") {
            Path::new(&sdk).join("Bin").join("glslc.exe")
        } else {
            Path::new(&sdk).join("bin").join("glslc")
        };
        if glslc.exists() {
            return Some(glslc);
        }
        println!("cargo:warning=glslc not found at {}", glslc.display());
    }

    match Command::new("glslc").arg("--version").output() {
        Ok(out) if out.status.success() => Some(PathBuf::from("glslc")),
        _ => None,
    }
}

fn needs_compile(src: &Path, out: &Path) -> bool {
    match (std::fs::metadata(src), std::fs::metadata(out)) {
        (Ok(src_meta), Ok(out_meta)) => match (src_meta.modified(), out_meta.modified()) {
            (Ok(src_time), Ok(out_time)) => src_time > out_time,
            _ => true,
        },
        _ => true,
    }
}

fn main() {
    println!("cargo:rerun-if-changed=../shaders");
    println!("cargo:rerun-if-env-changed=VULKAN_SDK");
    println!("cargo:rerun-if-env-changed=SKIP_SHADERS");

    if env::var("SKIP_SHADERS").is_ok() {
        eprintln!("info: Skipping shader compilation (SKIP_SHADERS set)");
        return;
    }

    let shader_dir = PathBuf::from("../shaders");
    let shader_files = match std::fs::read_dir(&shader_dir) {
        Ok(files) => files,
        Err(_) => {
            eprintln!("info: No shader directory found at: {:?}", shader_dir);
            return;
        }
    };

    let Some(glslc) = find_glslc() else {
        println!("cargo:warning=glslc not found, shaders/*.spv not rebuilt");
        return;
    };

    let mut compiled_count = 0;
    for entry in shader_files {
        let path = match entry {
            Ok(e) => e.path(),
            Err(e) => {
                eprintln!("warning: Error reading shader directory entry: {}", e);
                continue;
            }
        };

        let is_stage = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("vert") | Some("frag")
        );
        let Some(stem) = path.file_stem().filter(|_| is_stage) else {
            continue;
        };
        let out_file = shader_dir.join(stem).with_extension("spv");

        if !needs_compile(&path, &out_file) {
            eprintln!("info: Shader {:?} is up to date", path.file_name().unwrap_or_default());
            continue;
        }

        let status = Command::new(&glslc)
            .arg("--target-env=opengl")
            .arg(&path)
            .arg("-o")
            .arg(&out_file)
            .status();

        match status {
            Ok(s) if s.success() => {
                eprintln!("info: Compiled {:?} -> {:?}", path, out_file);
                compiled_count += 1;
            }
            Ok(s) => {
                eprintln!("error: glslc failed for {:?} with exit code: {}", path, s.code().unwrap_or(-1));
                panic!("Shader compilation failed");
            }
            Err(e) => {
                eprintln!("error: Failed to run glslc for {:?}: {}", path, e);
                panic!("Failed to execute shader compiler");
            }
        }
    }

    eprintln!("info: Compiled {} shader(s)", compiled_count);
}
