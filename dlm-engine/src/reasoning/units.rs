//! Unit table for conversions. Every unit belongs to one quantity group and
//! carries its size in that group's base unit.

use std::fmt;

use super::lexicon::lexical_root;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Length,
    Time,
    Mass,
    Volume,
    Currency,
}

impl Quantity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Time => "time",
            Self::Mass => "mass",
            Self::Volume => "volume",
            Self::Currency => "currency",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub name: &'static str,
    /// Plural forms and abbreviations.
    pub aliases: &'static [&'static str],
    pub quantity: Quantity,
    /// Size in the base unit of `quantity`.
    pub scale: f64,
}

const fn unit(
    name: &'static str,
    aliases: &'static [&'static str],
    quantity: Quantity,
    scale: f64,
) -> Unit {
    Unit {
        name,
        aliases,
        quantity,
        scale,
    }
}

// Base units: meter, second, kilogram, liter, dollar.
static STANDARD_UNITS: &[Unit] = &[
    unit("inch", &["inches"], Quantity::Length, 0.0254),
    unit("foot", &["feet", "ft"], Quantity::Length, 0.3048),
    unit("yard", &["yards", "yd"], Quantity::Length, 0.9144),
    unit("millimeter", &["millimeters", "mm"], Quantity::Length, 0.001),
    unit("centimeter", &["centimeters", "cm"], Quantity::Length, 0.01),
    unit("meter", &["meters", "m"], Quantity::Length, 1.0),
    unit("kilometer", &["kilometers", "km"], Quantity::Length, 1000.0),
    unit("mile", &["miles", "mi"], Quantity::Length, 1609.344),
    unit("second", &["seconds", "sec"], Quantity::Time, 1.0),
    unit("minute", &["minutes", "min"], Quantity::Time, 60.0),
    unit("hour", &["hours", "hr"], Quantity::Time, 3600.0),
    unit("day", &["days"], Quantity::Time, 86_400.0),
    unit("week", &["weeks"], Quantity::Time, 604_800.0),
    unit("month", &["months"], Quantity::Time, 2_592_000.0),
    unit("year", &["years", "yr"], Quantity::Time, 31_536_000.0),
    unit("milligram", &["milligrams", "mg"], Quantity::Mass, 0.000_001),
    unit("gram", &["grams", "g"], Quantity::Mass, 0.001),
    unit("kilogram", &["kilograms", "kg"], Quantity::Mass, 1.0),
    unit("ounce", &["ounces", "oz"], Quantity::Mass, 0.028_349_523_1),
    unit("pound", &["pounds", "lb", "lbs"], Quantity::Mass, 0.453_592_37),
    unit("milliliter", &["milliliters", "ml"], Quantity::Volume, 0.001),
    unit("liter", &["liters", "l"], Quantity::Volume, 1.0),
    unit("cup", &["cups"], Quantity::Volume, 0.236_588),
    unit("pint", &["pints"], Quantity::Volume, 0.473_176),
    unit("quart", &["quarts"], Quantity::Volume, 0.946_353),
    unit("gallon", &["gallons"], Quantity::Volume, 3.785_41),
    unit("penny", &["pennies", "cent", "cents"], Quantity::Currency, 0.01),
    unit("nickel", &["nickels"], Quantity::Currency, 0.05),
    unit("dime", &["dimes"], Quantity::Currency, 0.10),
    unit("quarter", &["quarters"], Quantity::Currency, 0.25),
    unit("dollar", &["dollars"], Quantity::Currency, 1.0),
];

#[derive(Debug, Clone, Copy)]
pub struct UnitTable {
    units: &'static [Unit],
}

impl UnitTable {
    pub fn standard() -> Self {
        Self {
            units: STANDARD_UNITS,
        }
    }

    /// Every name and alias, used as conversion triggers.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        self.units
            .iter()
            .flat_map(|u| std::iter::once(u.name).chain(u.aliases.iter().copied()))
    }

    /// Unit named by `token`, matching aliases exactly and names by lexical root.
    pub fn find(&self, token: &str) -> Option<&'static Unit> {
        let lowered = token.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        let root = lexical_root(&lowered);
        self.units.iter().find(|u| {
            u.name == lowered
                || u.aliases.contains(&lowered.as_str())
                || (lowered.len() > 2 && lexical_root(u.name) == root)
        })
    }
}

/// Units from different quantity groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompatibleUnits {
    pub from: &'static Unit,
    pub to: &'static Unit,
}

/// `value` expressed in `from`, converted to `to` via the shared base unit.
pub fn convert(
    value: f64,
    from: &'static Unit,
    to: &'static Unit,
) -> Result<f64, IncompatibleUnits> {
    if from.quantity != to.quantity {
        return Err(IncompatibleUnits { from, to });
    }
    Ok(value * from.scale / to.scale)
}
