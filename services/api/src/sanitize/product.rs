use serde_json::Value;

use super::{FieldReader, Mode, ValidationErrors};
use crate::models::{NewProduct, Prices, ProductPatch};

pub fn new_product(raw: &Value) -> Result<NewProduct, ValidationErrors> {
    let mut reader = FieldReader::new(raw, Mode::Create)?;
    let fields = read_fields(&mut reader);
    reader.finish()?;

    Ok(NewProduct {
        name: fields.name.unwrap_or_default(),
        slug: fields.slug.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        image: fields.image.unwrap_or_default(),
        version: fields.version.unwrap_or_default(),
        size: fields.size.unwrap_or_default(),
        updated: fields.updated.unwrap_or_default(),
        category: fields.category.unwrap_or_default(),
        product_type: fields.product_type.unwrap_or_default(),
        status_enabled: fields.status_enabled.unwrap_or(false),
        status_label: fields.status_label.unwrap_or_default(),
        prices: Prices {
            day: fields.price_day.unwrap_or(0.0),
            week: fields.price_week.unwrap_or(0.0),
        },
        download_link: fields.download_link.unwrap_or_default(),
        features_enabled: fields.features_enabled.unwrap_or(false),
        features_data: fields.features_data.unwrap_or_default(),
    })
}

pub fn product_patch(raw: &Value) -> Result<ProductPatch, ValidationErrors> {
    let mut reader = FieldReader::new(raw, Mode::Update)?;
    let patch = read_fields(&mut reader);
    reader.finish()?;
    Ok(patch)
}

fn read_fields(r: &mut FieldReader<'_>) -> ProductPatch {
    let [price_day, price_week] = r.nested_prices("prices", ["day", "week"]);

    ProductPatch {
        name: r.required_text("name"),
        slug: r.slug("slug"),
        description: r.text("desc"),
        image: r.required_text("image"),
        version: r.text("version"),
        size: r.text("size"),
        updated: r.text("updated"),
        category: r.text("category"),
        product_type: r.text("type"),
        status_enabled: r.flag("statusEnabled"),
        status_label: r.text("statusLabel"),
        price_day,
        price_week,
        download_link: r.text("downloadLink"),
        features_enabled: r.flag("featuresEnabled"),
        features_data: r.features("featuresData"),
    }
}
