pub mod normalize;
pub mod ocr;
pub mod similarity;
pub mod validation;
