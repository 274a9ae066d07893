use crate::extract::Field;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CpuRecord {
    pub model:          Field<String>,
    pub logical_cpus:   Field<usize>,
    pub physical_cores: Field<usize>,
    pub mhz:            Field<f64>,
}
