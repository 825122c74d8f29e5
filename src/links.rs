//! Outbound link helpers.

use crate::Result;
use url::Url;

/// Placeholder number used by the page.
pub const WHATSAPP_PHONE: &str = "1234567890";

pub const DEFAULT_WHATSAPP_MESSAGE: &str = "Hi MR PKUNAKA, I found your portfolio and would like to connect";

/// A file offered for download through a temporary anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Download {
    pub href: &'static str,
    pub file_name: &'static str,
}

pub const RESUME: Download = Download {
    href: "/resume-mr-pkunaka.pdf",
    file_name: "MR_PKUNAKA_Resume.pdf",
};

/// Chat link for `phone` with `message` prefilled.
pub fn whatsapp_url(phone: &str, message: &str) -> Result<Url> {
    let mut url = Url::parse("https://wa.me/")?.join(phone)?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_url() {
        let url = whatsapp_url(WHATSAPP_PHONE, "Hi there & hello").unwrap();
        assert_eq!(url.as_str(), "https://wa.me/1234567890?text=Hi+there+%26+hello");
        let text: Vec<_> = url.query_pairs().collect();
        assert_eq!(text[0].1, "Hi there & hello");
    }

    #[test]
    fn test_default_message_round_trips() {
        let url = whatsapp_url(WHATSAPP_PHONE, DEFAULT_WHATSAPP_MESSAGE).unwrap();
        let (_, text) = url.query_pairs().next().unwrap();
        assert_eq!(text, DEFAULT_WHATSAPP_MESSAGE);
    }

    #[test]
    fn test_resume() {
        assert_eq!(RESUME.href, "/resume-mr-pkunaka.pdf");
        assert_eq!(RESUME.file_name, "MR_PKUNAKA_Resume.pdf");
    }
}
