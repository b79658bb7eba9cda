use std::env;

fn main() {
    // Gemini APIキーをビルド環境から埋め込む（GEMINI_API_KEY優先、なければAPI_KEY）
    let api_key = env::var("GEMINI_API_KEY")
        .or_else(|_| env::var("API_KEY"))
        .ok()
        .filter(|k| !k.is_empty());

    match api_key {
        Some(key) => {
            println!("cargo:rustc-env=SCAN_TABLE_API_KEY={}", key);
        }
        None => {
            println!("cargo:warning=GEMINI_API_KEY is not set; the key must be entered in the settings view");
        }
    }

    if let Ok(model) = env::var("GEMINI_MODEL") {
        if !model.is_empty() {
            println!("cargo:rustc-env=SCAN_TABLE_MODEL={}", model);
        }
    }

    // 環境変数変更時に再ビルド
    println!("cargo:rerun-if-env-changed=GEMINI_API_KEY");
    println!("cargo:rerun-if-env-changed=API_KEY");
    println!("cargo:rerun-if-env-changed=GEMINI_MODEL");
}
