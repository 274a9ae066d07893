use crate::extract::{CpuKey, Field, Fields};
use crate::models::cpu::CpuRecord;

pub fn normalize_cpu(cpuinfo: &str) -> CpuRecord {
    let fields = Fields::parse(cpuinfo);

    let logical = fields.count(CpuKey::Processor);
    let sockets = fields.distinct(CpuKey::PhysicalId).max(1);
    let physical_cores = fields
        .get(CpuKey::Cores)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .map(|per_socket| per_socket * sockets);

    CpuRecord {
        model:          fields.get(CpuKey::Model).map(str::to_string),
        logical_cpus:   if logical > 0 { Field::Known(logical) } else { Field::Absent },
        physical_cores,
        mhz:            fields.get(CpuKey::Mhz).and_then(|v| v.trim().parse::<f64>().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sockets() {
        let mut info = String::new();
        for (cpu, socket) in [(0, 0), (1, 0), (2, 1), (3, 1)] {
            info.push_str(&format!(
                "processor\t: {cpu}\nmodel\t\t: 85\nmodel name\t: Intel(R) Xeon(R) Silver 4110 CPU @ 2.10GHz\n\
physical id\t: {socket}\ncpu cores\t: 2\ncpu MHz\t\t: 2100.000\n\n"
            ));
        }
        let rec = normalize_cpu(&info);
        assert_eq!(rec.model, Field::Known("Intel(R) Xeon(R) Silver 4110 CPU @ 2.10GHz".to_string()));
        assert_eq!(rec.logical_cpus, Field::Known(4));
        assert_eq!(rec.physical_cores, Field::Known(4));
        assert_eq!(rec.mhz, Field::Known(2100.0));
    }

    #[test]
    fn arm_without_core_counts() {
        let info = "processor\t: 0\nBogoMIPS\t: 108.00\n\nprocessor\t: 1\nBogoMIPS\t: 108.00\n\nModel\t\t: Raspberry Pi 4 Model B Rev 1.4\n";
        let rec = normalize_cpu(info);
        assert_eq!(rec.logical_cpus, Field::Known(2));
        assert_eq!(rec.physical_cores, Field::Absent);
        assert_eq!(rec.model, Field::Known("Raspberry Pi 4 Model B Rev 1.4".to_string()));
    }
}
