use serde_json::Value;

use super::{FieldReader, Mode, ValidationErrors};
use crate::models::{AccountType, NewPremiumAccount, PremiumAccountPatch};

pub fn new_premium_account(raw: &Value) -> Result<NewPremiumAccount, ValidationErrors> {
    let mut reader = FieldReader::new(raw, Mode::Create)?;
    let fields = read_fields(&mut reader);
    reader.finish()?;

    Ok(NewPremiumAccount {
        title: fields.title.unwrap_or_default(),
        slug: fields.slug.unwrap_or_default(),
        img: fields.img.unwrap_or_default(),
        gallery: fields.gallery.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        price: fields.price.unwrap_or(0.0),
        is_available: fields.is_available.unwrap_or(true),
        badges: fields.badges.unwrap_or_default(),
        // finish() has already rejected a missing type
        account_type: fields.account_type.unwrap_or(AccountType::Social),
    })
}

pub fn premium_account_patch(raw: &Value) -> Result<PremiumAccountPatch, ValidationErrors> {
    let mut reader = FieldReader::new(raw, Mode::Update)?;
    let patch = read_fields(&mut reader);
    reader.finish()?;
    Ok(patch)
}

fn read_fields(r: &mut FieldReader<'_>) -> PremiumAccountPatch {
    PremiumAccountPatch {
        title: r.required_text("title"),
        slug: r.slug("slug"),
        img: r.required_text("img"),
        gallery: r.string_list("gallery"),
        description: r.required_text("desc"),
        price: r.price("price"),
        is_available: r.flag("isAvailable"),
        badges: r.string_list("badges"),
        account_type: r.required_choice("type"),
    }
}
