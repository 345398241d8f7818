pub mod app_setting;
pub mod category;
pub mod contact_submission;
pub mod feature_definition;
pub mod feature_value;
pub mod machine;
pub mod machine_accessory;
pub mod machine_download;
pub mod machine_image;
pub mod machine_section;
pub mod parameter_definition;
pub mod parameter_value;
pub mod user;
pub mod variant_group;
pub mod variant_option;

// Re-export entities under unambiguous names
pub use app_setting::{Entity as AppSetting, Model as AppSettingModel};
pub use category::{Entity as Category, Model as CategoryModel};
pub use contact_submission::{Entity as ContactSubmission, Model as ContactSubmissionModel};
pub use feature_definition::{Entity as FeatureDefinition, Model as FeatureDefinitionModel};
pub use feature_value::{Entity as FeatureValue, Model as FeatureValueModel};
pub use machine::{Entity as Machine, Model as MachineModel};
pub use machine_accessory::{Entity as MachineAccessory, Model as MachineAccessoryModel};
pub use machine_download::{Entity as MachineDownload, Model as MachineDownloadModel};
pub use machine_image::{Entity as MachineImage, Model as MachineImageModel};
pub use machine_section::{Entity as MachineSection, Model as MachineSectionModel};
pub use parameter_definition::{
    Entity as ParameterDefinition, Model as ParameterDefinitionModel, PriceModifierType,
};
pub use parameter_value::{Entity as ParameterValue, Model as ParameterValueModel};
pub use user::{Entity as User, Model as UserModel};
pub use variant_group::{Entity as VariantGroup, Model as VariantGroupModel};
pub use variant_option::{Entity as VariantOption, Model as VariantOptionModel};
