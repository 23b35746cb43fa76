use crate::error::AppError;
use crate::store::Language;
use crate::upload::UploadError;
use chrono::{DateTime, FixedOffset, Timelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Title,
    Subtitle,
    UploadPrompt,
    UploadHint,
    DropHere,
    Open,
    ModelLoading,
    ModelUnavailable,
    DecodingImage,
    ImageReady,
    Analyzing,
    Generate,
    Regenerate,
    NewPhoto,
    ChooseAnother,
    Share,
    Copied,
    ResultTitle,
    Confidence,
    Tip,
    History,
    HistoryEmpty,
    ClearHistory,
    RetryModel,
    SaveHistory,
    Theme,
    Language,
    SharePrefix,
}

pub fn text(language: Language, key: Text) -> &'static str {
    match language {
        Language::Ko => match key {
            Text::Title => "AI 로또번호 생성기",
            Text::Subtitle => "사진을 업로드하면 AI가 행운의 번호를 생성해드립니다",
            Text::UploadPrompt => "사진을 업로드하세요",
            Text::UploadHint => "드래그 앤 드롭 또는 파일 경로 입력 (최대 10MB)",
            Text::DropHere => "여기에 놓으세요",
            Text::Open => "열기",
            Text::ModelLoading => "AI 모델 로딩 중...",
            Text::ModelUnavailable => "AI 모델을 사용할 수 없습니다",
            Text::DecodingImage => "이미지를 불러오는 중...",
            Text::ImageReady => "번호를 생성할 준비가 되었습니다",
            Text::Analyzing => "AI가 분석 중...",
            Text::Generate => "행운의 번호 생성하기",
            Text::Regenerate => "다시 생성",
            Text::NewPhoto => "새 사진으로",
            Text::ChooseAnother => "다른 사진 선택",
            Text::Share => "공유하기",
            Text::Copied => "클립보드에 복사되었습니다!",
            Text::ResultTitle => "당신의 행운 번호",
            Text::Confidence => "AI 신뢰도",
            Text::Tip => "팁: 로또는 확률 게임입니다. 과도한 구매는 자제해주세요.",
            Text::History => "최근 기록",
            Text::HistoryEmpty => "아직 기록이 없습니다",
            Text::ClearHistory => "기록 삭제",
            Text::RetryModel => "모델 다시 불러오기",
            Text::SaveHistory => "기록 저장",
            Text::Theme => "테마",
            Text::Language => "언어",
            Text::SharePrefix => "내 사진으로 생성한 로또번호",
        },
        Language::En => match key {
            Text::Title => "AI Lotto Number Generator",
            Text::Subtitle => "Upload a photo and the AI picks your lucky numbers",
            Text::UploadPrompt => "Upload a photo",
            Text::UploadHint => "Drag and drop or enter a file path (max 10MB)",
            Text::DropHere => "Drop it here",
            Text::Open => "Open",
            Text::ModelLoading => "Loading AI model...",
            Text::ModelUnavailable => "AI model is unavailable",
            Text::DecodingImage => "Reading image...",
            Text::ImageReady => "Ready to generate numbers",
            Text::Analyzing => "AI is analyzing...",
            Text::Generate => "Generate lucky numbers",
            Text::Regenerate => "Generate again",
            Text::NewPhoto => "New photo",
            Text::ChooseAnother => "Choose another photo",
            Text::Share => "Share",
            Text::Copied => "Copied to clipboard!",
            Text::ResultTitle => "Your lucky numbers",
            Text::Confidence => "AI confidence",
            Text::Tip => "Tip: the lottery is a game of chance. Please play responsibly.",
            Text::History => "Recent results",
            Text::HistoryEmpty => "No results yet",
            Text::ClearHistory => "Clear history",
            Text::RetryModel => "Reload model",
            Text::SaveHistory => "Save history",
            Text::Theme => "Theme",
            Text::Language => "Language",
            Text::SharePrefix => "Lotto numbers generated from my photo",
        },
    }
}

pub fn error_message(language: Language, error: &AppError) -> String {
    let message = match (language, error) {
        (Language::Ko, AppError::ScorerUnavailable(_)) => "AI 모델을 불러오는데 실패했습니다.",
        (Language::Ko, AppError::InferenceFailed(_)) => "번호 생성 중 오류가 발생했습니다.",
        (Language::Ko, AppError::NoImage) => "이미지를 먼저 업로드해주세요.",
        (Language::Ko, AppError::StorageUnavailable(_)) => "저장된 기록을 불러오지 못했습니다.",
        (Language::Ko, AppError::InvalidInputImage(UploadError::TooLarge { .. })) => {
            "파일 크기는 10MB 이하여야 합니다."
        }
        (Language::Ko, AppError::InvalidInputImage(UploadError::Read { .. })) => {
            "파일을 읽을 수 없습니다."
        }
        (Language::Ko, AppError::InvalidInputImage(_)) => "이미지 파일만 업로드 가능합니다.",
        (Language::En, AppError::ScorerUnavailable(_)) => "Failed to load the AI model.",
        (Language::En, AppError::InferenceFailed(_)) => {
            "Something went wrong while generating numbers."
        }
        (Language::En, AppError::NoImage) => "Please upload an image first.",
        (Language::En, AppError::StorageUnavailable(_)) => "Saved history could not be loaded.",
        (Language::En, AppError::InvalidInputImage(UploadError::TooLarge { .. })) => {
            "Files must be 10MB or smaller."
        }
        (Language::En, AppError::InvalidInputImage(UploadError::Read { .. })) => {
            "The file could not be read."
        }
        (Language::En, AppError::InvalidInputImage(_)) => "Only image files can be uploaded.",
    };
    message.to_string()
}

pub fn format_timestamp(language: Language, timestamp: DateTime<Utc>, timezone: FixedOffset) -> String {
    let local = timestamp.with_timezone(&timezone);
    match language {
        Language::Ko => {
            let meridiem = if local.hour() < 12 { "오전" } else { "오후" };
            format!(
                "{} {} {}",
                local.format("%Y년 %-m월 %-d일"),
                meridiem,
                local.format("%I:%M")
            )
        }
        Language::En => local.format("%b %-d, %Y %I:%M %p").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let kst = FixedOffset::east_opt(9 * 3600).unwrap();
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 5, 7, 0).unwrap();

        assert_eq!(
            format_timestamp(Language::Ko, timestamp, kst),
            "2024년 5월 1일 오후 02:07"
        );
        assert_eq!(
            format_timestamp(Language::En, timestamp, kst),
            "May 1, 2024 02:07 PM"
        );
    }

    #[test]
    fn test_error_messages_are_localized() {
        let error = AppError::InvalidInputImage(UploadError::NotAnImage);

        assert_eq!(
            error_message(Language::Ko, &error),
            "이미지 파일만 업로드 가능합니다."
        );
        assert_eq!(
            error_message(Language::En, &error),
            "Only image files can be uploaded."
        );

        let error = AppError::StorageUnavailable("stored value is corrupt".to_string());
        assert_eq!(
            error_message(Language::En, &error),
            "Saved history could not be loaded."
        );
    }
}
