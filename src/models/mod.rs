pub mod openweather;
pub mod agro;
pub mod gemini;
pub mod views;
