use crate::lotto::label::LABEL_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// `[1, height, width, 3]`
    Nhwc,
    /// `[1, 3, height, width]`
    Nchw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model_url: String,
    pub image_size: u32,
    pub num_classes: usize,
    pub input_layout: InputLayout,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_url: "./models/lotto".to_string(),
            image_size: 224,
            num_classes: LABEL_COUNT,
            input_layout: InputLayout::Nhwc,
        }
    }
}
