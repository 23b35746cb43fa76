use crate::lotto::number_set::LottoNumberSet;
use crate::lotto_picture::text::{text, Text};
use crate::store::Language;

pub const SHARE_TAGS: &str = "#로또픽처 #AI로또";

pub fn share_text(language: Language, numbers: &LottoNumberSet) -> String {
    format!(
        "{}: {}\n\n{}",
        text(language, Text::SharePrefix),
        numbers,
        SHARE_TAGS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_text() {
        let numbers = LottoNumberSet::new(vec![3, 11, 19, 27, 38, 44]).unwrap();

        assert_eq!(
            share_text(Language::Ko, &numbers),
            "내 사진으로 생성한 로또번호: 3, 11, 19, 27, 38, 44\n\n#로또픽처 #AI로또"
        );
        assert!(share_text(Language::En, &numbers).starts_with("Lotto numbers generated from my photo: 3, 11"));
    }
}
