//! Russian user-facing text and color aliases

use super::color::ColorName;

pub const HEADING: &str = "=== Шестиугольная мозаика ===";
pub const WINDOW_TITLE: &str = "Шестиугольная мозаика";
pub const MOSAIC_READY: &str = "Мозаика готова! Нажмите на окно для выхода.";

pub const AVAILABLE_COLORS: &str = "Доступные цвета:";
pub const INVALID_COLOR: &str = "Недопустимый цвет. Попробуйте снова.";
pub const CHOOSE_FIRST_COLOR: &str = "Выберите первый цвет: ";
pub const CHOOSE_SECOND_COLOR: &str = "Выберите второй цвет: ";

pub const PLACEMENT_CHOICE: &str = "Выберите вариант размещения цветов (1-чередование, 2-градиент): ";
pub const INVALID_CHOICE: &str = "Неверный выбор! Введите 1 или 2.";

pub const HEXAGON_COUNT_PROMPT: &str = "Введите количество шестиугольников в ряду (4-20): ";
pub const INVALID_NUMBER: &str = "Неверный ввод! Введите число.";
pub const NUMBER_RANGE_ERROR: &str = "Число должно быть от 4 до 20!";

/// The display name of every color in the order they are listed to the user
pub const COLOR_NAMES: [(&str, ColorName); 8] = [
    ("красный", ColorName::Red),
    ("синий", ColorName::Blue),
    ("зеленый", ColorName::Green),
    ("желтый", ColorName::Yellow),
    ("фиолетовый", ColorName::Purple),
    ("оранжевый", ColorName::Orange),
    ("розовый", ColorName::Pink),
    ("голубой", ColorName::Cyan),
];

/// Resolves a color typed by the user, accepting both the russian display
/// names and the canonical english names. Case and surrounding whitespace are ignored.
///
/// # Parameters
///
/// input: The text typed by the user
pub fn resolve_color(input: &str) -> Option<ColorName> {
    let input = input.trim().to_lowercase();

    COLOR_NAMES
        .iter()
        .find(|(alias, _)| *alias == input)
        .map(|(_, name)| *name)
        .or_else(|| input.parse().ok())
}
