//! Error types for markup parsing

/// Errors produced while materializing an XML document
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// Underlying XML syntax error
    #[error("malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute inside a start tag
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Document is not valid UTF-8
    #[error("document is not valid utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Document contained no root element
    #[error("document contains no root element")]
    NoRoot,

    /// Close tag without a matching open tag
    #[error("unbalanced close tag: '{0}'")]
    UnbalancedClose(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_root_display() {
        let err = MarkupError::NoRoot;
        assert_eq!(err.to_string(), "document contains no root element");
    }

    #[test]
    fn unbalanced_close_display() {
        let err = MarkupError::UnbalancedClose("Block".to_string());
        assert!(err.to_string().contains("Block"));
    }
}
