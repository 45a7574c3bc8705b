//! HostAddress

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use krb_asn1::{template, Asn1Result, Asn1Type, Collection, FieldDescriptor, Value};

use crate::basic::{collection, int32, octets};
use crate::constants::address_type;

static HOST_ADDRESS: &[FieldDescriptor] = &[
    FieldDescriptor::context(0, "addr-type", template::integer),
    FieldDescriptor::context(1, "address", template::octet_string),
];

/// `HostAddress ::= SEQUENCE { addr-type [0] Int32, address [1] OCTET STRING }`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddress {
    pub addr_type: i32,
    pub address: Vec<u8>,
}

impl HostAddress {
    pub fn new(addr_type: i32, address: impl Into<Vec<u8>>) -> Self {
        Self {
            addr_type,
            address: address.into(),
        }
    }

    /// NetBIOS names are space padded to 16 octets
    pub fn netbios(name: &str) -> Self {
        let mut address = name.as_bytes().to_vec();
        address.resize(address.len().max(16), b' ');
        Self::new(address_type::NETBIOS, address)
    }

    /// The address as an IP address, for the IPv4 and IPv6 types
    pub fn ip(&self) -> Option<IpAddr> {
        match self.addr_type {
            address_type::IPV4 => <[u8; 4]>::try_from(self.address.as_slice())
                .ok()
                .map(|octets| IpAddr::V4(Ipv4Addr::from(octets))),
            address_type::IPV6 => <[u8; 16]>::try_from(self.address.as_slice())
                .ok()
                .map(|octets| IpAddr::V6(Ipv6Addr::from(octets))),
            _ => None,
        }
    }
}

impl From<IpAddr> for HostAddress {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v4) => Self::new(address_type::IPV4, v4.octets()),
            IpAddr::V6(v6) => Self::new(address_type::IPV6, v6.octets()),
        }
    }
}

impl Asn1Type for HostAddress {
    fn template() -> Value {
        Value::sequence(HOST_ADDRESS)
    }

    fn to_value(&self) -> Asn1Result<Value> {
        let fields = Collection::new(HOST_ADDRESS)
            .with(0, Value::integer(self.addr_type.into()))?
            .with(1, Value::octet_string(self.address.as_slice()))?;
        Ok(Value::Sequence(fields))
    }

    fn from_value(value: &Value) -> Asn1Result<Self> {
        let fields = collection(value, "HostAddress")?;
        Ok(Self {
            addr_type: int32(fields, 0)?,
            address: octets(fields, 1)?,
        })
    }
}
