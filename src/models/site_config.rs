//! Site configuration document matching the front end's SiteConfig interface.

use serde::{Deserialize, Serialize};

/// Password accepted when no admin password has been stored yet.
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// The singleton document holding company identity, section copy and image references.
///
/// Every field carries a default, so a stored document missing fields (or no
/// document at all) still deserializes into a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub company_name: String,
    pub primary_color: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub hero_subtitle: String,
    pub hero_title: String,
    pub hero_description: String,
    pub hero_image: String,
    pub about_subtitle: String,
    pub about_title: String,
    pub about_description: String,
    pub about_image: String,
    pub business_subtitle: String,
    pub business_title: String,
    pub banner_subtitle: String,
    pub banner_title: String,
    pub banner_description: String,
    pub banner_image: String,
    pub news_subtitle: String,
    pub news_title: String,
    pub contact_subtitle: String,
    pub contact_title: String,
    pub contact_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            company_name: "FARMLAND".to_string(),
            primary_color: "#556B2F".to_string(),
            contact_email: "farmland@farmland.co.kr".to_string(),
            contact_phone: "031-557-5220".to_string(),
            address: "경기도 남양주시 진접읍 봉현로 133".to_string(),
            hero_subtitle: "FRESH FROM THE FIELD".to_string(),
            hero_title: "자연이 키운 신선함,\n팜랜드가 식탁까지 전합니다".to_string(),
            hero_description:
                "산지에서 식탁까지, 철저한 품질 관리와 전처리 공정으로 신선한 농산물을 공급합니다."
                    .to_string(),
            hero_image: "https://images.unsplash.com/photo-1500382017468-9049fed747ef?q=80&w=2070"
                .to_string(),
            about_subtitle: "ABOUT US".to_string(),
            about_title: "건강한 식탁을 위한\n끊임없는 연구와 노력".to_string(),
            about_description: "FARMLAND는 단순히 농산물을 전달하는 것을 넘어, 철저한 품질 관리와 최적화된 전처리 공정을 통해 고객사의 비즈니스에 가치를 더합니다."
                .to_string(),
            about_image: "https://images.unsplash.com/photo-1498837167922-ddd27525d352?q=80&w=2070"
                .to_string(),
            business_subtitle: "OUR BUSINESS".to_string(),
            business_title: "핵심 사업 영역".to_string(),
            banner_subtitle: "PARTNERSHIP".to_string(),
            banner_title: "농가와 기업을 잇는 든든한 파트너".to_string(),
            banner_description: "계약 재배와 산지 직거래로 안정적인 공급망을 만들어 갑니다."
                .to_string(),
            banner_image: "https://images.unsplash.com/photo-1464226184884-fa280b87c399?q=80&w=2070"
                .to_string(),
            news_subtitle: "NEWS".to_string(),
            news_title: "새로운 소식".to_string(),
            contact_subtitle: "CONTACT US".to_string(),
            contact_title: "비즈니스 문의".to_string(),
            contact_description: "FARMLAND와 함께 성장할 파트너를 찾습니다.\n농산물 대량 공급, 계약 재배, 기타 협력 제안 등 무엇이든 문의해 주세요."
                .to_string(),
            admin_password: None,
        }
    }
}

impl SiteConfig {
    /// The password `authenticate` compares against: the stored one, or the
    /// built-in default when none (or an empty one) is stored.
    pub fn effective_password(&self) -> &str {
        self.admin_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Copy safe to hand to the public site.
    pub fn redacted(&self) -> Self {
        Self {
            admin_password: None,
            ..self.clone()
        }
    }

    /// Return a new document with one field replaced.
    pub fn with_field(&self, field: ConfigField, value: String) -> Self {
        let mut next = self.clone();
        *next.field_mut(field) = value;
        next
    }

    fn field_mut(&mut self, field: ConfigField) -> &mut String {
        match field {
            ConfigField::CompanyName => &mut self.company_name,
            ConfigField::PrimaryColor => &mut self.primary_color,
            ConfigField::ContactEmail => &mut self.contact_email,
            ConfigField::ContactPhone => &mut self.contact_phone,
            ConfigField::Address => &mut self.address,
            ConfigField::HeroSubtitle => &mut self.hero_subtitle,
            ConfigField::HeroTitle => &mut self.hero_title,
            ConfigField::HeroDescription => &mut self.hero_description,
            ConfigField::HeroImage => &mut self.hero_image,
            ConfigField::AboutSubtitle => &mut self.about_subtitle,
            ConfigField::AboutTitle => &mut self.about_title,
            ConfigField::AboutDescription => &mut self.about_description,
            ConfigField::AboutImage => &mut self.about_image,
            ConfigField::BusinessSubtitle => &mut self.business_subtitle,
            ConfigField::BusinessTitle => &mut self.business_title,
            ConfigField::BannerSubtitle => &mut self.banner_subtitle,
            ConfigField::BannerTitle => &mut self.banner_title,
            ConfigField::BannerDescription => &mut self.banner_description,
            ConfigField::BannerImage => &mut self.banner_image,
            ConfigField::NewsSubtitle => &mut self.news_subtitle,
            ConfigField::NewsTitle => &mut self.news_title,
            ConfigField::ContactSubtitle => &mut self.contact_subtitle,
            ConfigField::ContactTitle => &mut self.contact_title,
            ConfigField::ContactDescription => &mut self.contact_description,
        }
    }
}

/// Editable text and image fields of [`SiteConfig`].
///
/// The admin password is not listed; only the password-change operation sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    CompanyName,
    PrimaryColor,
    ContactEmail,
    ContactPhone,
    Address,
    HeroSubtitle,
    HeroTitle,
    HeroDescription,
    HeroImage,
    AboutSubtitle,
    AboutTitle,
    AboutDescription,
    AboutImage,
    BusinessSubtitle,
    BusinessTitle,
    BannerSubtitle,
    BannerTitle,
    BannerDescription,
    BannerImage,
    NewsSubtitle,
    NewsTitle,
    ContactSubtitle,
    ContactTitle,
    ContactDescription,
}

impl ConfigField {
    pub const ALL: [ConfigField; 24] = [
        ConfigField::CompanyName,
        ConfigField::PrimaryColor,
        ConfigField::ContactEmail,
        ConfigField::ContactPhone,
        ConfigField::Address,
        ConfigField::HeroSubtitle,
        ConfigField::HeroTitle,
        ConfigField::HeroDescription,
        ConfigField::HeroImage,
        ConfigField::AboutSubtitle,
        ConfigField::AboutTitle,
        ConfigField::AboutDescription,
        ConfigField::AboutImage,
        ConfigField::BusinessSubtitle,
        ConfigField::BusinessTitle,
        ConfigField::BannerSubtitle,
        ConfigField::BannerTitle,
        ConfigField::BannerDescription,
        ConfigField::BannerImage,
        ConfigField::NewsSubtitle,
        ConfigField::NewsTitle,
        ConfigField::ContactSubtitle,
        ConfigField::ContactTitle,
        ConfigField::ContactDescription,
    ];

    /// Wire name, identical to the JSON key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::CompanyName => "companyName",
            ConfigField::PrimaryColor => "primaryColor",
            ConfigField::ContactEmail => "contactEmail",
            ConfigField::ContactPhone => "contactPhone",
            ConfigField::Address => "address",
            ConfigField::HeroSubtitle => "heroSubtitle",
            ConfigField::HeroTitle => "heroTitle",
            ConfigField::HeroDescription => "heroDescription",
            ConfigField::HeroImage => "heroImage",
            ConfigField::AboutSubtitle => "aboutSubtitle",
            ConfigField::AboutTitle => "aboutTitle",
            ConfigField::AboutDescription => "aboutDescription",
            ConfigField::AboutImage => "aboutImage",
            ConfigField::BusinessSubtitle => "businessSubtitle",
            ConfigField::BusinessTitle => "businessTitle",
            ConfigField::BannerSubtitle => "bannerSubtitle",
            ConfigField::BannerTitle => "bannerTitle",
            ConfigField::BannerDescription => "bannerDescription",
            ConfigField::BannerImage => "bannerImage",
            ConfigField::NewsSubtitle => "newsSubtitle",
            ConfigField::NewsTitle => "newsTitle",
            ConfigField::ContactSubtitle => "contactSubtitle",
            ConfigField::ContactTitle => "contactTitle",
            ConfigField::ContactDescription => "contactDescription",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == s)
    }

    /// Fields that may hold an inline-encoded image instead of a URL.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            ConfigField::HeroImage | ConfigField::AboutImage | ConfigField::BannerImage
        )
    }
}
