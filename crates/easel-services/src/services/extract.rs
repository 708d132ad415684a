use super::generation::{Candidate, InlineImage, Part};

/// First binary payload across all candidates, scanning candidates and then
/// parts in order. Text parts and empty candidates are skipped.
pub fn first_inline_image(candidates: Vec<Candidate>) -> Option<InlineImage> {
    candidates
        .into_iter()
        .flat_map(|candidate| candidate.parts)
        .find_map(|part| match part {
            Part::InlineImage(image) => Some(image),
            Part::Text(_) => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str, data: &[u8]) -> Part {
        Part::InlineImage(InlineImage {
            mime_type: mime.to_string(),
            data: data.to_vec(),
        })
    }

    fn text(s: &str) -> Part {
        Part::Text(s.to_string())
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(first_inline_image(Vec::new()), None);
        assert_eq!(first_inline_image(vec![Candidate::default()]), None);
    }

    #[test]
    fn test_text_only() {
        let candidates = vec![Candidate {
            parts: vec![text("I can't draw that"), text("sorry")],
        }];
        assert_eq!(first_inline_image(candidates), None);
    }

    #[test]
    fn test_payload_in_second_candidate_second_part() {
        let candidates = vec![
            Candidate {
                parts: vec![text("thinking...")],
            },
            Candidate {
                parts: vec![text("here you go"), image("image/png", &[1, 2, 3])],
            },
        ];

        let found = first_inline_image(candidates).unwrap();
        assert_eq!(found.data, vec![1, 2, 3]);
        assert_eq!(found.mime_type, "image/png");
    }

    #[test]
    fn test_first_payload_wins() {
        let candidates = vec![
            Candidate {
                parts: vec![image("image/jpeg", &[9]), image("image/png", &[8])],
            },
            Candidate {
                parts: vec![image("image/webp", &[7])],
            },
        ];

        let found = first_inline_image(candidates).unwrap();
        assert_eq!(found.data, vec![9]);
        assert_eq!(found.mime_type, "image/jpeg");
    }
}
