mod wizard_component;

pub use wizard_component::WizardComponent;
