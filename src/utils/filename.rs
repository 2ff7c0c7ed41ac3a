//! 上传文件名与扩展名规则

/// 头像允许的扩展名
pub const PICTURE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
/// 认证材料允许的扩展名
pub const DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// 取出小写扩展名，并检查是否在允许范围内
pub fn allowed_extension(filename: &str, allowed: &[&str]) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    allowed.contains(&ext.as_str()).then_some(ext)
}

/// 下载用文件名：不能为空，不能包含路径分隔符、".."、引号、分号或控制字符
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '"' | ';') || c.is_control())
}

/// 新头像文件名：`<uuid>.<ext>`
pub fn picture_filename(ext: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4(), ext)
}

/// 认证材料文件名：`<id>-<field>.<ext>`
pub fn document_filename(user_id: i32, field: &str, ext: &str) -> String {
    format!("{}-{}.{}", user_id, field, ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extension_case_insensitive() {
        assert_eq!(
            allowed_extension("me.JPG", PICTURE_EXTENSIONS).as_deref(),
            Some("jpg")
        );
        assert_eq!(
            allowed_extension("scan.final.Pdf", DOCUMENT_EXTENSIONS).as_deref(),
            Some("pdf")
        );
        assert!(allowed_extension("doc.pdf", PICTURE_EXTENSIONS).is_none());
        assert!(allowed_extension("noext", PICTURE_EXTENSIONS).is_none());
        assert!(allowed_extension(".png", PICTURE_EXTENSIONS).is_none());
        assert!(allowed_extension("evil.png.exe", PICTURE_EXTENSIONS).is_none());
    }

    #[test]
    fn test_safe_filename() {
        assert!(is_safe_filename("12-carte_id.pdf"));
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.pdf"));
        assert!(!is_safe_filename("a\\b.pdf"));
        assert!(!is_safe_filename("x..y"));
        assert!(!is_safe_filename("a\".pdf"));
        assert!(!is_safe_filename("a.pdf; filename=b.exe"));
        assert!(!is_safe_filename("a\r\nb.pdf"));
        assert!(!is_safe_filename("a\0b"));
    }

    #[test]
    fn test_generated_names() {
        let name = picture_filename("png");
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 36 + 4);
        assert_eq!(
            document_filename(12, "certificatScolaire", "pdf"),
            "12-certificatScolaire.pdf"
        );
    }
}
